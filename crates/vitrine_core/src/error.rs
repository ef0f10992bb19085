use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the page builder core.
///
/// Operations on ids that do not exist are not errors: update, delete and
/// select on an unknown id are silent no-ops (see [`crate::store::PageBuilder`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Unknown element type: {0}")]
    UnknownElementType(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Classification of errors for logging and user display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Caused by the user's request (e.g. dragging an unsupported block).
    UserError,
    /// Local storage or file I/O failure.
    SystemError,
    /// Invalid or missing configuration.
    ConfigError,
}

impl BuilderError {
    /// Returns the broad error category for routing and display purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownElementType(_) => ErrorCategory::UserError,
            Self::Storage(_) => ErrorCategory::SystemError,
            Self::Config(_) => ErrorCategory::ConfigError,
        }
    }

    /// Returns a user-friendly message (hides internal details).
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownElementType(kind) => format!("Unsupported block: {kind}"),
            Self::Storage(_) => "Could not save the page. Check disk space and permissions.".into(),
            Self::Config(msg) => format!("Configuration issue: {msg}"),
        }
    }
}
