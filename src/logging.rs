//! Diagnostics for the `demands` binary.
//!
//! Human-readable events go to stderr so they never mix with command output
//! on stdout. `--log-file` adds a second sink that records every event as one
//! JSON object per line, which is how store writes and repository changes can
//! be audited after the fact.

use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::{Mutex, Once};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `-q` limits output to errors and each
/// `-v` widens it: info shows repository changes, debug adds store loads and
/// saves, trace adds every store transaction.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a subscriber is
/// already installed.
pub fn init_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_directives(verbosity, quiet)))?;

    let audit = log_file
        .map(|path| {
            File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))
        })
        .transpose()?
        .map(|file| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 0)
        .with_ansi(std::io::stderr().is_terminal());

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(audit)
        .try_init()?;
    Ok(())
}

fn level_directives(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "demand_tracker=warn",
        1 => "demand_tracker=info",
        2 => "demand_tracker=debug,rusqlite=debug",
        _ => "demand_tracker=trace",
    }
}

/// Route crate events into the test harness output, once per process.
///
/// Integration tests call this from their shared setup. `RUST_LOG` narrows or
/// widens it like in the binary; the fallback shows store and repository
/// activity at debug.
pub fn init_test_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level_directives(2, false)));
        // Another harness may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
