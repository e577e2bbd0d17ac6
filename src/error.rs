//! Error types for `demand_tracker`.
//!
//! Every fallible operation returns [`Result`]. Rejections the shell is
//! expected to show to the user (validation, not-found, duplicate) are
//! distinct variants so callers can match on them; storage and I/O failures
//! wrap their source errors.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DemandError>;

/// Errors produced by the repository, stores, config and CLI.
#[derive(Debug, Error)]
pub enum DemandError {
    /// A required field was empty or a value could not be parsed.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// No demand with this id exists.
    #[error("Demand not found: {id}")]
    DemandNotFound { id: i64 },

    /// The name is already registered.
    #[error("{entity} '{name}' already exists")]
    Duplicate { entity: &'static str, name: String },

    /// No `.demands` directory was found.
    #[error("Demand tracker not initialized: run `demands init` first")]
    NotInitialized,

    #[error("Configuration error: {0}")]
    Config(String),

    /// A persisted file exists but could not be parsed.
    #[error("Corrupt data in {} at line {line}: {reason}", path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl DemandError {
    /// Shorthand for a [`DemandError::Validation`].
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Machine-readable classification of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::DemandNotFound { .. } => ErrorCode::NotFound,
            Self::Duplicate { .. } => ErrorCode::Duplicate,
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::Config(_) | Self::Yaml(_) => ErrorCode::ConfigError,
            Self::Corrupt { .. } | Self::Json(_) => ErrorCode::CorruptData,
            Self::Io(_) => ErrorCode::IoError,
            Self::Database(_) => ErrorCode::DatabaseError,
        }
    }

    /// True for rejections that leave state untouched and only need a
    /// message in the shell.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::DemandNotFound { .. }
                | Self::Duplicate { .. }
        )
    }

    /// Remediation hint, where one is obvious.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::DemandNotFound { .. } => {
                Some("Run `demands list` to see existing demand ids.".to_string())
            }
            Self::NotInitialized => Some("Run `demands init` in the project root.".to_string()),
            Self::Duplicate { entity, .. } => Some(format!(
                "{entity} names are unique (case-sensitive); pick another name."
            )),
            Self::Corrupt { path, .. } => Some(format!(
                "Fix or remove {} and try again.",
                path.display()
            )),
            _ => None,
        }
    }
}

/// Stable error codes exposed in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    NotFound,
    Duplicate,
    NotInitialized,
    ConfigError,
    CorruptData,
    IoError,
    DatabaseError,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::Duplicate => "DUPLICATE",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::CorruptData => "CORRUPT_DATA",
            Self::IoError => "IO_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Process exit code for this class of error.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::ValidationFailed => 2,
            Self::NotFound => 3,
            Self::Duplicate => 4,
            Self::NotInitialized | Self::ConfigError => 5,
            Self::CorruptData | Self::IoError | Self::DatabaseError => 6,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload rendered by the CLI in `--json` mode.
#[derive(Debug, Clone, Serialize)]
pub struct StructuredError {
    pub code: ErrorCode,
    pub message: String,
    pub hint: Option<String>,
    pub retryable: bool,
}

impl StructuredError {
    #[must_use]
    pub fn from_error(err: &DemandError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            hint: err.hint(),
            retryable: matches!(err, DemandError::Io(_) | DemandError::Database(_)),
        }
    }

    /// `{"error": {...}}` envelope.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_map_to_distinct_exit_codes() {
        let validation = DemandError::validation("description", "cannot be empty");
        let missing = DemandError::DemandNotFound { id: 7 };
        let dup = DemandError::Duplicate {
            entity: "Client",
            name: "Acme".to_string(),
        };

        assert!(validation.is_user_error());
        assert!(missing.is_user_error());
        assert!(dup.is_user_error());
        assert_eq!(validation.code().exit_code(), 2);
        assert_eq!(missing.code().exit_code(), 3);
        assert_eq!(dup.code().exit_code(), 4);
    }

    #[test]
    fn structured_error_envelope_shape() {
        let err = DemandError::DemandNotFound { id: 42 };
        let value = StructuredError::from_error(&err).to_json();
        assert_eq!(value["error"]["code"], "NOT_FOUND");
        assert_eq!(value["error"]["message"], "Demand not found: 42");
        assert_eq!(value["error"]["retryable"], false);
        assert!(value["error"]["hint"].is_string());
    }

    #[test]
    fn io_errors_are_not_user_errors() {
        let err = DemandError::from(std::io::Error::other("disk full"));
        assert!(!err.is_user_error());
        assert_eq!(err.code(), ErrorCode::IoError);
    }
}
