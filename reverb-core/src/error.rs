//! Core error types for Reverb

use thiserror::Error;

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the shared domain types
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid replay start time '{value}': {reason}")]
    InvalidReplayStartTime { value: String, reason: String },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Request store error for app '{app}': {message}")]
    Store { app: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub fn store(app: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            app: app.into(),
            message: message.into(),
        }
    }
}
