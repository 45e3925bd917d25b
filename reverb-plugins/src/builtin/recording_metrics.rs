//! Metrics emitter keeping every record in memory

use parking_lot::Mutex;
use std::any::Any;

use reverb_core::MetricRecord;
use reverb_plugin::{MetricsEmitter, Plugin, PluginMetadata, PluginType};

/// Records are kept in emission order until [`RecordingMetrics::take`]
pub struct RecordingMetrics {
    metadata: PluginMetadata,
    records: Mutex<Vec<MetricRecord>>,
}

impl RecordingMetrics {
    pub const MODULE: &'static str = "recording_metrics";

    pub fn new() -> Self {
        Self {
            metadata: PluginMetadata::new(
                Self::MODULE,
                "Recording metrics",
                env!("CARGO_PKG_VERSION"),
                "Keeps metric records in memory for inspection",
                PluginType::Metrics,
            ),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<MetricRecord> {
        self.records.lock().clone()
    }

    pub fn take(&self) -> Vec<MetricRecord> {
        std::mem::take(&mut *self.records.lock())
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Default for RecordingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for RecordingMetrics {
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

impl MetricsEmitter for RecordingMetrics {
    fn emit(&self, record: &MetricRecord) {
        self.records.lock().push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverb_core::BaseDimensions;

    #[test]
    fn test_records_in_order() {
        let recorder = RecordingMetrics::new();
        let base = BaseDimensions::new("test", "worker", "app1", "qa", 60);

        recorder.emit(&MetricRecord::layered("num_requests", 4, Vec::new(), &base));
        recorder.emit(&MetricRecord::layered("timeouts", 1, Vec::new(), &base));

        let names: Vec<_> = recorder
            .records()
            .iter()
            .map(|r| r.name().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["num_requests", "timeouts"]);

        assert_eq!(recorder.take().len(), 2);
        assert!(recorder.is_empty());
    }
}
