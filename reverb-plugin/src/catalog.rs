//! Compile-time catalog of discoverable capability modules

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::Plugin;

/// Creates a fresh plugin instance
pub type PluginFactory = Arc<dyn Fn() -> Arc<dyn Plugin> + Send + Sync>;

/// Package location → module name → factory
#[derive(Clone, Default)]
pub struct PluginCatalog {
    locations: BTreeMap<String, BTreeMap<String, PluginFactory>>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` under `location`, replacing any previous factory
    pub fn register<F>(&mut self, location: &str, module: &str, factory: F)
    where
        F: Fn() -> Arc<dyn Plugin> + Send + Sync + 'static,
    {
        self.locations
            .entry(location.to_string())
            .or_default()
            .insert(module.to_string(), Arc::new(factory));
    }

    pub fn with_module<F>(mut self, location: &str, module: &str, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Plugin> + Send + Sync + 'static,
    {
        self.register(location, module, factory);
        self
    }

    pub fn factory(&self, location: &str, module: &str) -> Option<PluginFactory> {
        self.locations.get(location)?.get(module).cloned()
    }

    /// Module names discoverable under `location`
    pub fn modules(&self, location: &str) -> Vec<&str> {
        self.locations
            .get(location)
            .map(|modules| modules.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, location: &str, module: &str) -> bool {
        self.locations
            .get(location)
            .is_some_and(|modules| modules.contains_key(module))
    }
}

impl std::fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (location, modules) in &self.locations {
            map.entry(location, &modules.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}
