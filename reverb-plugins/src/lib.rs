//! Built-in capability modules
//!
//! Every module here is registered under the [`BUILTIN_LOCATION`] package
//! location by [`builtin_catalog`], which is the discovery table the runtime
//! hands to the plugin registry.

pub mod builtin;

use std::sync::Arc;

use reverb_plugin::{Plugin, PluginCatalog};

pub use builtin::log_metrics::LogMetrics;
pub use builtin::recording_metrics::RecordingMetrics;

/// Package location the built-in modules are discoverable under
pub const BUILTIN_LOCATION: &str = "plugins";

/// Catalog of every built-in module
pub fn builtin_catalog() -> PluginCatalog {
    let mut catalog = PluginCatalog::new();
    register_builtins(&mut catalog);
    catalog
}

/// Add the built-in modules to an existing catalog
pub fn register_builtins(catalog: &mut PluginCatalog) {
    catalog.register(BUILTIN_LOCATION, LogMetrics::MODULE, || {
        Arc::new(LogMetrics::new()) as Arc<dyn Plugin>
    });
    catalog.register(BUILTIN_LOCATION, RecordingMetrics::MODULE, || {
        Arc::new(RecordingMetrics::new()) as Arc<dyn Plugin>
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_lists_modules() {
        let catalog = builtin_catalog();
        assert_eq!(
            catalog.modules(BUILTIN_LOCATION),
            vec!["log_metrics", "recording_metrics"]
        );
    }

    #[test]
    fn test_every_builtin_is_a_metrics_emitter() {
        let catalog = builtin_catalog();
        for module in catalog.modules(BUILTIN_LOCATION) {
            let factory = catalog.factory(BUILTIN_LOCATION, module).unwrap();
            let plugin = factory();
            assert_eq!(plugin.metadata().id, module);
            assert!(plugin.as_metrics_emitter().is_some(), "{}", module);
        }
    }
}
