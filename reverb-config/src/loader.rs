//! Configuration document loading and resolution

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domains::logging::{LogFormat, LogLevel};
use crate::domains::{ResolvedConfig, ReverbConfig};
use crate::env::EnvSnapshot;
use crate::error::{ConfigError, ConfigResult};
use crate::stage::resolve_stage;

/// Default configuration document name
pub const DEFAULT_CONFIG_FILE: &str = "reverb.yml";

/// Environment variable holding an extra path template for the document;
/// every `{}` in it is replaced by the document name
pub const CONF_PATH_ENV_VAR: &str = "REVERB_CONF_PATH";

/// Prefix of the `<PREFIX>_*` environment overrides
const ENV_OVERRIDE_PREFIX: &str = "REVERB";

const CONFIG_SECTION: &str = "config";
const PLUGINS_SECTION: &str = "plugins";

/// Environment declarations read from the raw `config` section, before the
/// stage is known
#[derive(Debug, Deserialize)]
struct EnvDeclarations {
    #[serde(default)]
    env_vars_to_get: Vec<String>,
    #[serde(default = "default_required")]
    required_env_vars: Vec<String>,
}

impl EnvDeclarations {
    /// Declared variables followed by any required ones not already listed
    fn capture_names(&self) -> Vec<String> {
        let mut names = self.env_vars_to_get.clone();
        for name in &self.required_env_vars {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

fn default_required() -> Vec<String> {
    ReverbConfig::default().required_env_vars
}

/// Configuration loader with candidate-path lookup and environment overrides
pub struct ConfigLoader {
    file_name: String,
    override_template: Option<String>,
}

impl ConfigLoader {
    /// Loader for `reverb.yml`, honouring `REVERB_CONF_PATH`
    pub fn new() -> Self {
        Self {
            file_name: DEFAULT_CONFIG_FILE.to_string(),
            override_template: std::env::var(CONF_PATH_ENV_VAR)
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Replace the override path template read from the environment
    pub fn with_override_template(mut self, template: Option<String>) -> Self {
        self.override_template = template;
        self
    }

    /// Paths tried in order: local, parent-relative, operator override
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(&self.file_name),
            Path::new("..").join(&self.file_name),
        ];
        if let Some(template) = &self.override_template {
            paths.push(PathBuf::from(template.replace("{}", &self.file_name)));
        }
        paths
    }

    /// First candidate path that exists
    pub fn locate(&self) -> ConfigResult<PathBuf> {
        let candidates = self.candidate_paths();
        candidates
            .iter()
            .find(|path| path.is_file())
            .cloned()
            .ok_or_else(|| ConfigError::ConfigNotFound {
                file: self.file_name.clone(),
                tried: candidates,
            })
    }

    /// Read and parse the whole document
    pub fn load_document(&self) -> ConfigResult<Mapping> {
        let path = self.locate()?;
        log::debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load and resolve configuration from the process environment
    pub fn load(&self) -> ConfigResult<ResolvedConfig> {
        self.load_with(|name| std::env::var(name).ok())
    }

    /// Load and resolve configuration, reading variables through `lookup`
    pub fn load_with<F>(&self, lookup: F) -> ConfigResult<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let document = self.load_document()?;
        self.resolve_document(&document, lookup)
    }

    /// Resolve an already parsed document against the environment
    pub fn resolve_document<F>(&self, document: &Mapping, lookup: F) -> ConfigResult<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_config = section(document, CONFIG_SECTION)?
            .ok_or_else(|| ConfigError::MissingSection(CONFIG_SECTION.to_string()))?;

        let declarations: EnvDeclarations =
            serde_yaml::from_value(Value::Mapping(raw_config.clone()))?;
        let env = EnvSnapshot::capture(&declarations.capture_names(), &lookup);
        env.require(&declarations.required_env_vars)?;
        let stage = env.stage()?.to_string();

        let resolved = resolve_stage(&raw_config, &stage)?;
        let mut config: ReverbConfig = serde_yaml::from_value(Value::Mapping(resolved))?;
        self.apply_env_overrides(&mut config, &lookup)?;
        config.validate_all()?;

        let plugins = match section(document, PLUGINS_SECTION)? {
            Some(raw_plugins) => plugin_names(&resolve_stage(&raw_plugins, &stage)?)?,
            None => BTreeMap::new(),
        };

        log::info!(
            "Resolved configuration for stage '{}' with {} plugin(s)",
            stage,
            plugins.len()
        );

        Ok(ResolvedConfig {
            stage,
            env,
            config,
            plugins,
        })
    }

    /// Apply `<PREFIX>_*` environment overrides
    fn apply_env_overrides<F>(&self, config: &mut ReverbConfig, lookup: &F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}_{}", ENV_OVERRIDE_PREFIX, name));

        if let Some(level) = var("LOG_LEVEL") {
            config.logging.level = LogLevel::from_str(&level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", level)))?;
        }

        if let Some(format) = var("LOG_FORMAT") {
            config.logging.format = LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        if let Some(debug) = var("DEBUG") {
            config.debug = debug
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid DEBUG: {}", e)))?;
        }

        if let Some(timeout) = var("HTTP_TIMEOUT") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_TIMEOUT: {}", e)))?;
            config.http.timeout = std::time::Duration::from_secs(seconds);
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn section(document: &Mapping, key: &str) -> ConfigResult<Option<Mapping>> {
    match document.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Mapping(mapping)) => Ok(Some(mapping.clone())),
        Some(_) => Err(ConfigError::DomainError {
            domain: key.to_string(),
            message: "section must be a mapping".to_string(),
        }),
    }
}

fn plugin_names(resolved: &Mapping) -> ConfigResult<BTreeMap<String, String>> {
    let mut plugins = BTreeMap::new();
    for (key, value) in resolved {
        let (Value::String(name), Value::String(module)) = (key, value) else {
            return Err(ConfigError::DomainError {
                domain: PLUGINS_SECTION.to_string(),
                message: format!(
                    "plugin entries must map a name to a module name, got {:?}: {:?}",
                    key, value
                ),
            });
        };
        plugins.insert(name.clone(), module.clone());
    }
    Ok(plugins)
}
