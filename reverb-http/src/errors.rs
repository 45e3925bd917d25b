//! HTTP error types

use std::time::Duration;

use crate::types::HttpMethodError;

/// Error type for replay transport operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The per-request deadline passed before a response arrived
    #[error("Request to {url} timed out after {}ms", .timeout.as_millis())]
    Timeout { url: String, timeout: Duration },

    #[error("Network error for {url}: {message}")]
    NetworkError { url: String, message: String },

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(#[from] HttpMethodError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl HttpError {
    /// Classify a reqwest failure for `url`
    pub fn from_reqwest(url: &str, timeout: Duration, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else {
            Self::NetworkError {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
