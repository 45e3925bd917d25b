//! Plugin system error types

use thiserror::Error;

/// Plugin system result type
pub type PluginResult<T> = Result<T, PluginError>;

/// Plugin system errors
#[derive(Error, Debug)]
pub enum PluginError {
    /// Logical name not present in the plugins configuration
    #[error("Plugin '{name}' not found")]
    PluginNotFound { name: String },

    /// Configured module has no entry in the catalog
    #[error("Plugin '{plugin}' is configured with module '{module}', which does not exist")]
    ModuleNotFound { plugin: String, module: String },

    /// Loaded module lacks the capability it was requested for
    #[error("Plugin '{name}' does not provide the {capability} capability")]
    CapabilityMismatch { name: String, capability: String },

    /// Plugin initialization failed
    #[error("Plugin '{name}' initialization failed: {reason}")]
    InitializationFailed { name: String, reason: String },
}
