//! Output context and mode detection.
//!
//! # Mode Selection Logic
//!
//! 1. `--json` flag → JSON mode (machine-readable)
//! 2. `--quiet` flag → Quiet mode (minimal output)
//! 3. Otherwise → Plain text

use serde::Serialize;

use super::text::terminal_width;

/// Output mode determining formatting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable text.
    #[default]
    Plain,

    /// JSON output for machine consumption.
    Json,

    /// Only data output; confirmations are suppressed.
    Quiet,
}

impl OutputMode {
    /// Returns true if this mode produces structured data (JSON).
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Json)
    }

    /// Returns true if this mode should minimize output.
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// Output context carrying the mode and terminal width.
#[derive(Debug, Clone)]
pub struct OutputContext {
    mode: OutputMode,
    width: usize,
}

impl Default for OutputContext {
    fn default() -> Self {
        Self::from_flags(false, false)
    }
}

impl OutputContext {
    #[must_use]
    pub const fn new(mode: OutputMode, width: usize) -> Self {
        Self { mode, width }
    }

    /// Create context from CLI flags. `json` wins over `quiet`.
    #[must_use]
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Plain
        };

        Self {
            mode,
            width: terminal_width(),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.mode.is_structured()
    }

    /// Terminal width in columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Print a value as pretty JSON on stdout.
    pub fn json_pretty<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(err) => tracing::error!(%err, "Failed to serialize output"),
        }
    }

    /// Print a confirmation line (plain mode only).
    pub fn success(&self, message: &str) {
        if self.mode == OutputMode::Plain {
            println!("{message}");
        }
    }

    /// Print data for humans (plain and quiet modes).
    pub fn print(&self, text: &str) {
        if !self.is_json() {
            print!("{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_flags_json() {
        let ctx = OutputContext::from_flags(true, true);
        assert_eq!(ctx.mode(), OutputMode::Json);
        assert!(ctx.is_json());
    }

    #[test]
    fn test_context_from_flags_quiet() {
        let ctx = OutputContext::from_flags(false, true);
        assert_eq!(ctx.mode(), OutputMode::Quiet);
        assert!(ctx.mode().is_quiet());
    }

    #[test]
    fn test_context_default_is_plain() {
        let ctx = OutputContext::default();
        assert_eq!(ctx.mode(), OutputMode::Plain);
        assert!(ctx.width() >= 40);
    }
}
