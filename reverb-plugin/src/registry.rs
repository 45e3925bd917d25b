//! Name-keyed plugin registry with lazy, idempotent loading

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use reverb_config::domains::qualify_module;
use reverb_config::ResolvedConfig;

use crate::catalog::{PluginCatalog, PluginFactory};
use crate::core::{MetricsHandle, Plugin};
use crate::error::{PluginError, PluginResult};

struct RegistryEntry {
    module_path: String,
    factory: PluginFactory,
}

/// Plugin registry resolved from the `plugins` configuration section.
///
/// Construction validates every configured name against the catalog but
/// instantiates nothing; `exists` is a map lookup; `load` calls the factory
/// on first use and caches the instance.
pub struct PluginRegistry {
    entries: BTreeMap<String, RegistryEntry>,
    loaded: RwLock<HashMap<String, Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    /// Build from a resolved configuration
    pub fn from_config(config: &ResolvedConfig, catalog: &PluginCatalog) -> PluginResult<Self> {
        Self::new(&config.config.plugins_location, &config.plugins, catalog)
    }

    /// Build from a location and a logical name → module name mapping
    pub fn new(
        location: &str,
        plugins: &BTreeMap<String, String>,
        catalog: &PluginCatalog,
    ) -> PluginResult<Self> {
        let mut entries = BTreeMap::new();

        for (name, module) in plugins {
            let module_path = qualify_module(location, module);
            let factory = catalog.factory(location, module).ok_or_else(|| {
                tracing::error!(
                    target: "plugin_registry",
                    plugin = %name,
                    module = %module_path,
                    available = ?catalog.modules(location),
                    "Configured plugin module not found"
                );
                PluginError::ModuleNotFound {
                    plugin: name.clone(),
                    module: module_path.clone(),
                }
            })?;

            entries.insert(
                name.clone(),
                RegistryEntry {
                    module_path,
                    factory,
                },
            );
        }

        tracing::debug!(
            target: "plugin_registry",
            "Plugin registry built with {} entries",
            entries.len()
        );

        Ok(Self {
            entries,
            loaded: RwLock::new(HashMap::new()),
        })
    }

    /// Registry with no configured plugins
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            loaded: RwLock::new(HashMap::new()),
        }
    }

    /// Whether `name` is configured. Never instantiates the module.
    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Instance for `name`, created on first call and shared afterwards
    pub fn load(&self, name: &str) -> PluginResult<Arc<dyn Plugin>> {
        if let Some(plugin) = self.loaded.read().get(name) {
            return Ok(Arc::clone(plugin));
        }

        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| PluginError::PluginNotFound {
                name: name.to_string(),
            })?;

        // Re-check under the write lock so concurrent first loads share one instance
        let mut loaded = self.loaded.write();
        let plugin = loaded.entry(name.to_string()).or_insert_with(|| {
            tracing::info!(
                target: "plugin_registry",
                plugin = %name,
                module = %entry.module_path,
                "Loading plugin"
            );
            (entry.factory)()
        });

        Ok(Arc::clone(plugin))
    }

    /// Load `name` and require the metrics capability
    pub fn load_metrics_emitter(&self, name: &str) -> PluginResult<MetricsHandle> {
        let plugin = self.load(name)?;
        MetricsHandle::new(name, plugin)
    }

    /// Qualified module path configured for `name`
    pub fn module_path(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.module_path.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.read().contains_key(name)
    }

    /// Number of instantiated plugins
    pub fn loaded_count(&self) -> usize {
        self.loaded.read().len()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.entries.keys().collect::<Vec<_>>())
            .field("loaded", &self.loaded_count())
            .finish()
    }
}
