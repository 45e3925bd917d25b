//! Plugin system for Reverb
//!
//! Capability modules (metrics backends today) are compiled in and listed in
//! a [`PluginCatalog`] keyed by package location and module name. The
//! `plugins` configuration section maps logical capability names onto those
//! modules; [`PluginRegistry`] validates that mapping at construction time
//! and instantiates modules lazily on first [`PluginRegistry::load`].

pub mod catalog;
pub mod core;
pub mod error;
pub mod registry;
pub mod types;

pub use catalog::{PluginCatalog, PluginFactory};
pub use core::{MetricsEmitter, MetricsHandle, Plugin, PluginMetadata};
pub use error::{PluginError, PluginResult};
pub use registry::PluginRegistry;
pub use types::PluginType;

/// Plugin API version
pub const PLUGIN_SYSTEM_VERSION: &str = "1.0.0";

/// Logical name of the metrics capability
pub const METRICS_PLUGIN: &str = "metrics";
