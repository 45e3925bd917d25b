//! Command implementations

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::path::Path;

use reverb_config::ConfigLoader;
use reverb_runtime::{consumer_handler, orchestrator_handler, InvocationContext, Runtime};

/// Read a JSON event file
pub async fn read_event(path: &Path) -> Result<JsonValue> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read event file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Event file {} is not valid JSON", path.display()))
}

/// Set `tick` on an orchestrator event object
pub fn with_tick(mut event: JsonValue, tick: Option<u64>) -> Result<JsonValue> {
    if let Some(tick) = tick {
        let object = event
            .as_object_mut()
            .context("Orchestrator event must be a JSON object")?;
        object.insert("tick".to_string(), JsonValue::from(tick));
    }
    Ok(event)
}

/// Descriptors held by a consume event: one object or a list
pub fn descriptor_events(event: JsonValue) -> Vec<JsonValue> {
    match event {
        JsonValue::Array(items) => items,
        single => vec![single],
    }
}

pub async fn orchestrate(loader: &ConfigLoader, event: &Path, tick: Option<u64>) -> Result<()> {
    let runtime = Runtime::bootstrap_with(loader)?;
    let event = with_tick(read_event(event).await?, tick)?;
    let context = InvocationContext::new("reverb-orchestrator");

    let (cur_params, descriptors) = orchestrator_handler(&runtime, event, &context).await?;

    let cur_params: JsonValue = serde_json::from_str(&cur_params)?;
    let descriptors: JsonValue = serde_json::from_str(&descriptors)?;
    println!("{}", serde_json::to_string_pretty(&cur_params)?);
    println!("{}", serde_json::to_string_pretty(&descriptors)?);
    Ok(())
}

pub async fn consume(loader: &ConfigLoader, event: &Path) -> Result<()> {
    let runtime = Runtime::bootstrap_with(loader)?;
    let budget = runtime.config().config.worker.execution_budget;

    for descriptor in descriptor_events(read_event(event).await?) {
        let app = descriptor
            .get("app")
            .and_then(JsonValue::as_str)
            .unwrap_or("<unknown>")
            .to_string();
        let context = InvocationContext::new("reverb-consumer").with_budget(budget);
        let num_requests = consumer_handler(&runtime, descriptor, &context).await?;
        println!("{}: {} requests", app, num_requests);
    }
    Ok(())
}

pub fn config_show(loader: &ConfigLoader) -> Result<()> {
    let resolved = loader.load().context("Failed to load configuration")?;
    print!("{}", serde_yaml::to_string(&resolved)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_tick_overrides_event() {
        let event = with_tick(json!({"apps_to_test": [], "tick": 1}), Some(4)).unwrap();
        assert_eq!(event["tick"], 4);
        let unchanged = with_tick(json!({"tick": 1}), None).unwrap();
        assert_eq!(unchanged["tick"], 1);
        assert!(with_tick(json!([1, 2]), Some(1)).is_err());
    }

    #[test]
    fn test_descriptor_events_accepts_list_or_object() {
        assert_eq!(descriptor_events(json!([{"app": "a"}, {"app": "b"}])).len(), 2);
        assert_eq!(descriptor_events(json!({"app": "a"})).len(), 1);
    }

    #[tokio::test]
    async fn test_read_event_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_event(&path).await.unwrap_err();
        assert!(err.to_string().contains("event.json"));
    }
}
