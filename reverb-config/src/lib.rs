//! Stage-aware configuration management for Reverb
//!
//! A single YAML document holds a `config` section and a `plugins`
//! section. Values may be stage-keyed (`{stage: {prod: ..., test: ...}}`);
//! they are resolved once, eagerly, against the deployment stage read from
//! the environment, and the result is validated and treated as immutable.

pub mod env;
pub mod error;
pub mod loader;
pub mod stage;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use env::EnvSnapshot;
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, CONF_PATH_ENV_VAR, DEFAULT_CONFIG_FILE};
pub use stage::resolve_stage;

// Re-export domain configurations
pub use domains::{
    http::HttpConfig, logging::LoggingConfig, worker::WorkerConfig, ResolvedConfig, ReverbConfig,
};

// Re-export utilities
pub use domains::utils::{serde_duration, serde_duration_ms};
