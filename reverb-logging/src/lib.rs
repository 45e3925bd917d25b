//! Structured logging infrastructure for Reverb
//!
//! - `tracing` subscriber bootstrap driven by the `logging` configuration
//! - [`ErrorInfo`], a structured record of a failure and its full context

pub mod error_info;
pub mod init;
pub mod severity;

pub use error_info::ErrorInfo;
pub use init::{init_logging_from_config, init_simple_tracing};
pub use severity::ErrorSeverity;
