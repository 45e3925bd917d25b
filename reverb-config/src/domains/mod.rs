//! Domain-specific configuration modules

pub mod http;
pub mod logging;
pub mod utils;
pub mod worker;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::env::EnvSnapshot;
use crate::error::ConfigResult;
use crate::validation::{validate_required_string, validate_timezone, Validatable};

/// The `config` section of the document, after stage resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbConfig {
    /// Environment variables captured into the snapshot
    pub env_vars_to_get: Vec<String>,

    /// Variables that must be non-empty for the process to start
    #[serde(default = "default_required_env_vars")]
    pub required_env_vars: Vec<String>,

    /// Package location capability modules are discovered under
    #[serde(default = "default_plugins_location")]
    pub plugins_location: String,

    /// Enables per-worker metric emission
    pub debug: bool,

    /// Zone replay start times are interpreted in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    pub http: http::HttpConfig,

    pub logging: logging::LoggingConfig,

    pub worker: worker::WorkerConfig,
}

impl Default for ReverbConfig {
    fn default() -> Self {
        Self {
            env_vars_to_get: default_required_env_vars(),
            required_env_vars: default_required_env_vars(),
            plugins_location: default_plugins_location(),
            debug: false,
            timezone: default_timezone(),
            http: http::HttpConfig::default(),
            logging: logging::LoggingConfig::default(),
            worker: worker::WorkerConfig::default(),
        }
    }
}

impl ReverbConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        self.worker.validate()?;
        Ok(())
    }
}

impl Validatable for ReverbConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.plugins_location, "plugins_location", self.domain_name())?;
        validate_timezone(&self.timezone, "timezone", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "config"
    }
}

/// Fully resolved process configuration.
///
/// Built once at process start and shared read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub stage: String,
    pub env: EnvSnapshot,
    pub config: ReverbConfig,
    /// Logical capability name to module name
    pub plugins: BTreeMap<String, String>,
}

impl ResolvedConfig {
    /// Fully qualified module path of a configured capability
    pub fn plugin_module_path(&self, name: &str) -> Option<String> {
        self.plugins
            .get(name)
            .map(|module| qualify_module(&self.config.plugins_location, module))
    }

    pub fn debug(&self) -> bool {
        self.config.debug
    }
}

/// Join a package location and a module name
pub fn qualify_module(location: &str, module: &str) -> String {
    format!("{}.{}", location, module)
}

fn default_required_env_vars() -> Vec<String> {
    vec!["region".to_string(), "stage".to_string()]
}

fn default_plugins_location() -> String {
    "plugins".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = ReverbConfig::default();
        assert!(config.validate_all().is_ok());
        assert_eq!(config.required_env_vars, vec!["region", "stage"]);
    }

    #[test]
    fn test_unknown_timezone_fails_validation() {
        let config = ReverbConfig {
            timezone: "Atlantis/Central".to_string(),
            ..Default::default()
        };
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_qualify_module() {
        assert_eq!(qualify_module("plugins", "log_metrics"), "plugins.log_metrics");
    }
}
