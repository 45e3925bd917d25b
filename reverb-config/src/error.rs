//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading configuration file
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// No candidate path held the configuration document
    #[error("Config file '{file}' not found, tried: {}", format_paths(.tried))]
    ConfigNotFound { file: String, tried: Vec<PathBuf> },

    /// Top-level section missing from the document
    #[error("Config document has no '{0}' section")]
    MissingSection(String),

    /// Required environment variable absent or empty
    #[error("Invalid environment variable detected: '{name}' must be set and non-empty")]
    MissingEnvVar { name: String },

    /// Stage-keyed value without an entry for the current stage
    #[error("Config key '{key}' has no value for stage '{stage}'")]
    StageValueMissing { key: String, stage: String },

    /// Validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvError(String),

    /// Domain-specific configuration error
    #[error("Domain configuration error in {domain}: {message}")]
    DomainError { domain: String, message: String },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
