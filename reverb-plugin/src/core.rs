//! Core plugin traits

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use reverb_core::MetricRecord;

use crate::error::{PluginError, PluginResult};
use crate::types::PluginType;

/// Plugin metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Module name the plugin is registered under
    pub id: String,
    /// Display name
    pub name: String,
    pub version: String,
    pub description: String,
    pub plugin_type: PluginType,
    /// Plugin API version this plugin was built for
    pub api_version: String,
}

impl PluginMetadata {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
        plugin_type: PluginType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            description: description.into(),
            plugin_type,
            api_version: crate::PLUGIN_SYSTEM_VERSION.to_string(),
        }
    }
}

/// A capability module.
///
/// Capabilities are exposed through the `as_*` accessors; a plugin returns
/// `Some` for each capability it implements.
pub trait Plugin: Send + Sync {
    fn metadata(&self) -> &PluginMetadata;

    /// Metric sink capability
    fn as_metrics_emitter(&self) -> Option<&dyn MetricsEmitter> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Metric sink.
///
/// Emission is best-effort: implementations log and swallow their own
/// failures, nothing is returned to the caller.
pub trait MetricsEmitter: Send + Sync {
    fn emit(&self, record: &MetricRecord);
}

/// Loaded plugin known to provide [`MetricsEmitter`]
#[derive(Clone)]
pub struct MetricsHandle {
    plugin: Arc<dyn Plugin>,
}

impl MetricsHandle {
    /// Wrap `plugin`, failing if it has no metrics capability
    pub fn new(name: &str, plugin: Arc<dyn Plugin>) -> PluginResult<Self> {
        if plugin.as_metrics_emitter().is_none() {
            return Err(PluginError::CapabilityMismatch {
                name: name.to_string(),
                capability: "metrics".to_string(),
            });
        }
        Ok(Self { plugin })
    }

    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }
}

impl MetricsEmitter for MetricsHandle {
    fn emit(&self, record: &MetricRecord) {
        if let Some(emitter) = self.plugin.as_metrics_emitter() {
            emitter.emit(record);
        }
    }
}

impl fmt::Debug for MetricsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsHandle")
            .field("plugin", &self.plugin.metadata().id)
            .finish()
    }
}
