//! Metric records handed to a metrics emitter

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Shared dimensions every record of one slice falls back to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseDimensions {
    fields: BTreeMap<String, JsonValue>,
}

impl BaseDimensions {
    pub fn new(
        stage: impl Into<String>,
        worker_name: impl Into<String>,
        app: impl Into<String>,
        identifier: impl Into<String>,
        mytime: i64,
    ) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("stage".to_string(), JsonValue::from(stage.into()));
        fields.insert("lambda_name".to_string(), JsonValue::from(worker_name.into()));
        fields.insert("app".to_string(), JsonValue::from(app.into()));
        fields.insert("identifier".to_string(), JsonValue::from(identifier.into()));
        fields.insert("mytime".to_string(), JsonValue::from(mytime));
        fields.insert("resolution".to_string(), JsonValue::from(1));
        Self { fields }
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.fields
            .insert("resolution".to_string(), JsonValue::from(resolution));
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.fields.iter()
    }
}

/// Flat metric record: `{name, val, stage, lambda_name, app, identifier, mytime, resolution}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricRecord {
    fields: BTreeMap<String, JsonValue>,
}

impl MetricRecord {
    /// Layer record-specific fields over `base`.
    ///
    /// Keys given here win over base keys of the same name; `base` is only
    /// read, so one set of dimensions can back every record of a slice.
    pub fn layered(
        name: &str,
        val: u64,
        extra: impl IntoIterator<Item = (String, JsonValue)>,
        base: &BaseDimensions,
    ) -> Self {
        let mut fields: BTreeMap<String, JsonValue> = extra.into_iter().collect();
        fields.insert("name".to_string(), JsonValue::from(name));
        fields.insert("val".to_string(), JsonValue::from(val));
        for (key, value) in base.iter() {
            fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Self { fields }
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(JsonValue::as_str)
    }

    pub fn val(&self) -> Option<u64> {
        self.fields.get("val").and_then(JsonValue::as_u64)
    }

    pub fn app(&self) -> Option<&str> {
        self.fields.get("app").and_then(JsonValue::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &BTreeMap<String, JsonValue> {
        &self.fields
    }
}
