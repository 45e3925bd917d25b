//! Metrics emitter writing each record as a structured log event

use std::any::Any;

use reverb_core::MetricRecord;
use reverb_plugin::{MetricsEmitter, Plugin, PluginMetadata, PluginType};

pub struct LogMetrics {
    metadata: PluginMetadata,
}

impl LogMetrics {
    pub const MODULE: &'static str = "log_metrics";

    pub fn new() -> Self {
        Self {
            metadata: PluginMetadata::new(
                Self::MODULE,
                "Log metrics",
                env!("CARGO_PKG_VERSION"),
                "Writes metric records to the tracing log",
                PluginType::Metrics,
            ),
        }
    }
}

impl Default for LogMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for LogMetrics {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    fn as_metrics_emitter(&self) -> Option<&dyn MetricsEmitter> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl MetricsEmitter for LogMetrics {
    fn emit(&self, record: &MetricRecord) {
        let fields = serde_json::to_string(record.fields()).unwrap_or_default();
        tracing::info!(
            target: "reverb_metrics",
            metric = record.name().unwrap_or_default(),
            val = record.val().unwrap_or_default(),
            app = record.app().unwrap_or_default(),
            record = %fields,
            "metric"
        );
    }
}
