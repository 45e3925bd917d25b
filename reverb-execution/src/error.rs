//! Error types for slice execution

use thiserror::Error;

use reverb_core::CoreError;
use reverb_plugin::PluginError;

pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Slice execution errors.
///
/// Individual request failures are counted, never raised; these cover the
/// surroundings of a slice.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to load request slice: {0}")]
    Store(#[source] CoreError),

    #[error("Metrics capability error: {0}")]
    Plugin(#[from] PluginError),

    #[error("Invalid work descriptor: {0}")]
    InvalidDescriptor(String),
}

impl From<CoreError> for ExecutionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Serialization(e) => Self::InvalidDescriptor(e.to_string()),
            other => Self::Store(other),
        }
    }
}
