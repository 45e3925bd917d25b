//! Orchestrator invocation payload

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use reverb_core::{AppOverride, TestParams};

use crate::error::OrchestratorResult;

/// Payload of one scheduling tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorEvent {
    pub apps_to_test: Vec<String>,
    /// Global defaults
    pub test_params: TestParams,
    #[serde(default)]
    pub overrides: Vec<AppOverride>,
    /// Zone replay start times are read in; the configured zone when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Ticks elapsed since the replay started, supplied by the scheduler
    #[serde(default)]
    pub tick: u64,
}

impl OrchestratorEvent {
    pub fn from_value(value: JsonValue) -> OrchestratorResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
