//! Replay test parameters and per-application overrides

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Global replay parameters shared by every application under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestParams {
    /// Target rate in requests per minute
    pub rate: i64,

    /// Length of one replay window in minutes
    pub loop_duration: u64,

    /// Replay start time, formatted `YYYY-M-D-H-M`
    pub replay_start_time: String,

    /// Base URL requests are replayed against
    #[serde(default)]
    pub base_url: String,

    /// Environment identifier of the target
    pub identifier: String,

    /// Extra headers attached to every replayed request
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

/// Override entry for a single application.
///
/// Only the fields present in the entry replace the defaults; absent
/// fields keep the default value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppOverride {
    #[serde(default)]
    pub app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

impl AppOverride {
    /// Produce the parameters for this override's application. The
    /// defaults are never mutated.
    pub fn apply_to(&self, defaults: &TestParams) -> TestParams {
        TestParams {
            rate: self.rate.unwrap_or(defaults.rate),
            loop_duration: self.loop_duration.unwrap_or(defaults.loop_duration),
            replay_start_time: self
                .replay_start_time
                .clone()
                .unwrap_or_else(|| defaults.replay_start_time.clone()),
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| defaults.base_url.clone()),
            identifier: self
                .identifier
                .clone()
                .unwrap_or_else(|| defaults.identifier.clone()),
            headers: self
                .headers
                .clone()
                .unwrap_or_else(|| defaults.headers.clone()),
        }
    }
}

/// Resolved parameters for one application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppParams {
    pub app: String,
    pub params: TestParams,
    /// Whether an override entry matched this application
    pub overridden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> TestParams {
        TestParams {
            rate: 23,
            loop_duration: 19,
            replay_start_time: "2018-6-18-17-06".to_string(),
            base_url: "http://reverb.example.com".to_string(),
            identifier: "qa".to_string(),
            headers: BTreeMap::new(),
        }
    }

    #[test]
    fn test_override_replaces_only_specified_fields() {
        let entry = AppOverride {
            app: Some("test-app1".to_string()),
            rate: Some(50),
            identifier: Some("prod".to_string()),
            ..Default::default()
        };

        let resolved = entry.apply_to(&defaults());
        assert_eq!(resolved.rate, 50);
        assert_eq!(resolved.identifier, "prod");
        assert_eq!(resolved.loop_duration, 19);
        assert_eq!(resolved.base_url, "http://reverb.example.com");
    }

    #[test]
    fn test_override_headers_replace_wholesale() {
        let mut base = defaults();
        base.headers.insert("a".to_string(), "1".to_string());

        let mut headers = BTreeMap::new();
        headers.insert("b".to_string(), "2".to_string());
        let entry = AppOverride {
            app: Some("x".to_string()),
            headers: Some(headers.clone()),
            ..Default::default()
        };

        assert_eq!(entry.apply_to(&base).headers, headers);
        assert_eq!(base.headers.len(), 1);
    }

    #[test]
    fn test_override_deserializes_without_app() {
        let entry: AppOverride = serde_json::from_str(r#"{"rate": 10}"#).unwrap();
        assert!(entry.app.is_none());
        assert_eq!(entry.rate, Some(10));
    }
}
