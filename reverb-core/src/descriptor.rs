//! Work descriptor handed from the orchestrator to a consumer worker

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreResult;
use crate::window::ReplayWindow;

/// One scheduled unit of replay work for one application.
///
/// Produced once per scheduling tick and consumed by exactly one worker
/// invocation. The descriptor is never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkDescriptor {
    pub app: String,
    /// Start of the historical window to replay, epoch seconds
    pub cur_timestamp: i64,
    /// Length of the historical window in seconds
    pub window_secs: u64,
    /// Target rate in requests per minute
    pub rate: i64,
    /// Window length in minutes
    pub loop_duration: u64,
    pub base_url: String,
    pub identifier: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Scheduling tick this descriptor was planned for
    #[serde(default)]
    pub tick: u64,
}

impl WorkDescriptor {
    pub fn window(&self) -> ReplayWindow {
        ReplayWindow::new(self.cur_timestamp, self.window_secs)
    }

    /// Upper bound on the number of requests replayed for this window
    pub fn request_budget(&self) -> usize {
        if self.rate <= 0 || self.loop_duration == 0 {
            return 0;
        }
        (self.rate as u64).saturating_mul(self.loop_duration) as usize
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(payload: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}
