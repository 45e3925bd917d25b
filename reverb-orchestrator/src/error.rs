//! Orchestrator error types

use thiserror::Error;

use reverb_core::CoreError;

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Override entry without an application identifier
    #[error("Override #{index} has no 'app' field")]
    MalformedOverride { index: usize },

    /// Override for an application that is not under test
    #[error("Override #{index} references unknown application '{app}'")]
    UnknownApplication { index: usize, app: String },

    #[error("Invalid orchestrator event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}
