//! Per-slice metric records

use serde_json::Value as JsonValue;

use reverb_core::{BaseDimensions, MetricRecord};
use reverb_plugin::{MetricsEmitter, PluginRegistry, METRICS_PLUGIN};

use crate::error::ExecutionResult;

/// Records for one slice, in emission order: the per-app request count, the
/// same count tagged `app: "all"`, then timeouts and exceptions when non-zero
pub fn build_metrics(
    base: &BaseDimensions,
    num_requests: u64,
    timeouts: u64,
    exceptions: u64,
) -> Vec<MetricRecord> {
    let mut records = vec![
        MetricRecord::layered("num_requests", num_requests, Vec::new(), base),
        MetricRecord::layered(
            "num_requests",
            num_requests,
            vec![("app".to_string(), JsonValue::from("all"))],
            base,
        ),
    ];

    if timeouts > 0 {
        records.push(MetricRecord::layered("timeouts", timeouts, Vec::new(), base));
    }
    if exceptions > 0 {
        records.push(MetricRecord::layered("exceptions", exceptions, Vec::new(), base));
    }

    records
}

/// Send the slice's records to the metrics capability.
///
/// Nothing is loaded or sent unless the capability is configured and
/// `debug` is on; per-worker metrics are high-cardinality. Returns the
/// number of records emitted.
pub fn emit_metrics(
    plugins: &PluginRegistry,
    debug: bool,
    base: &BaseDimensions,
    num_requests: u64,
    timeouts: u64,
    exceptions: u64,
) -> ExecutionResult<usize> {
    if !(plugins.exists(METRICS_PLUGIN) && debug) {
        return Ok(0);
    }

    let emitter = plugins.load_metrics_emitter(METRICS_PLUGIN)?;
    let records = build_metrics(base, num_requests, timeouts, exceptions);
    for record in &records {
        emitter.emit(record);
    }

    tracing::debug!(records = records.len(), "Emitted slice metrics");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverb_plugins::{builtin_catalog, RecordingMetrics, BUILTIN_LOCATION};
    use std::collections::BTreeMap;

    fn base() -> BaseDimensions {
        BaseDimensions::new("test", "reverb-consumer", "app1", "qa", 1_529_366_760)
    }

    fn registry_with(module: Option<&str>) -> PluginRegistry {
        let mut plugins = BTreeMap::new();
        if let Some(module) = module {
            plugins.insert(METRICS_PLUGIN.to_string(), module.to_string());
        }
        PluginRegistry::new(BUILTIN_LOCATION, &plugins, &builtin_catalog()).unwrap()
    }

    fn recorded(registry: &PluginRegistry) -> Vec<MetricRecord> {
        let plugin = registry.load(METRICS_PLUGIN).unwrap();
        plugin
            .as_any()
            .downcast_ref::<RecordingMetrics>()
            .unwrap()
            .records()
    }

    #[test]
    fn test_zero_failures_emit_only_counts() {
        let records = build_metrics(&base(), 10, 0, 0);
        let names: Vec<_> = records.iter().filter_map(|r| r.name()).collect();
        assert_eq!(names, vec!["num_requests", "num_requests"]);
        assert_eq!(records[0].app(), Some("app1"));
        assert_eq!(records[1].app(), Some("all"));
    }

    #[test]
    fn test_positive_failures_emit_records_in_order() {
        let records = build_metrics(&base(), 10, 1, 2);
        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.name().unwrap(), r.val().unwrap()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("num_requests", 10),
                ("num_requests", 10),
                ("timeouts", 1),
                ("exceptions", 2)
            ]
        );
        for record in &records {
            assert_eq!(record.get("stage"), Some(&JsonValue::from("test")));
            assert_eq!(record.get("resolution"), Some(&JsonValue::from(1)));
        }
    }

    #[test]
    fn test_emission_requires_debug() {
        let registry = registry_with(Some("recording_metrics"));

        assert_eq!(emit_metrics(&registry, false, &base(), 10, 3, 3).unwrap(), 0);
        assert_eq!(registry.loaded_count(), 0);

        assert_eq!(emit_metrics(&registry, true, &base(), 10, 3, 0).unwrap(), 3);
        assert_eq!(recorded(&registry).len(), 3);
    }

    #[test]
    fn test_absent_capability_is_a_no_op() {
        let registry = registry_with(None);
        assert_eq!(emit_metrics(&registry, true, &base(), 10, 5, 5).unwrap(), 0);
        assert_eq!(registry.loaded_count(), 0);
    }
}
