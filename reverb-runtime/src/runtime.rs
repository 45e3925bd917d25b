//! Process-wide dependencies

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use reverb_config::{ConfigLoader, ResolvedConfig};
use reverb_core::{JsonLinesRequestStore, RequestStore};
use reverb_execution::Consumer;
use reverb_http::{HttpManager, Transport};
use reverb_orchestrator::Orchestrator;
use reverb_plugin::PluginRegistry;
use reverb_plugins::builtin_catalog;

/// Environment variable naming the request log directory
pub const STORE_PATH_ENV_VAR: &str = "REVERB_STORE_PATH";

pub const DEFAULT_STORE_PATH: &str = "requests";

/// Dependencies shared by every invocation of this process
pub struct Runtime {
    config: Arc<ResolvedConfig>,
    plugins: Arc<PluginRegistry>,
    orchestrator: Orchestrator,
    consumer: Consumer,
}

impl Runtime {
    pub fn new(
        config: ResolvedConfig,
        plugins: PluginRegistry,
        store: Arc<dyn RequestStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let config = Arc::new(config);
        let plugins = Arc::new(plugins);
        let orchestrator = Orchestrator::from_config(&config);
        let consumer = Consumer::new(
            Arc::clone(&config),
            Arc::clone(&plugins),
            store,
            transport,
        );

        Self {
            config,
            plugins,
            orchestrator,
            consumer,
        }
    }

    /// Load configuration from the default candidate paths and the process
    /// environment, then wire the built-in plugins, the HTTP transport and
    /// the request log store
    pub fn bootstrap() -> Result<Self> {
        Self::bootstrap_with(&ConfigLoader::new())
    }

    pub fn bootstrap_with(loader: &ConfigLoader) -> Result<Self> {
        let config = loader.load().context("Failed to load configuration")?;
        reverb_logging::init_logging_from_config(&config.config.logging)?;
        Self::from_config(config)
    }

    /// Wire production dependencies around an already resolved configuration
    pub fn from_config(config: ResolvedConfig) -> Result<Self> {
        let plugins = PluginRegistry::from_config(&config, &builtin_catalog())
            .context("Failed to build plugin registry")?;
        let transport = HttpManager::with_config(config.config.http.clone())
            .context("Failed to build HTTP transport")?;

        let store_path = std::env::var(STORE_PATH_ENV_VAR)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));

        tracing::info!(
            stage = %config.stage,
            store = %store_path.display(),
            plugins = ?config.plugins,
            "Runtime initialized"
        );

        Ok(Self::new(
            config,
            plugins,
            Arc::new(JsonLinesRequestStore::new(store_path)),
            Arc::new(transport),
        ))
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn consumer(&self) -> &Consumer {
        &self.consumer
    }
}
