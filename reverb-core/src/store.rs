//! Historical request store contract
//!
//! The store owning raw request logs lives outside Reverb; the worker only
//! asks it for the requests of one application inside one window.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::window::ReplayWindow;

/// One captured production request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayRequest {
    /// Capture time, epoch seconds
    pub timestamp: i64,
    #[serde(default = "default_method")]
    pub method: String,
    /// Path and query, joined onto the descriptor's base URL
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl ReplayRequest {
    pub fn get(timestamp: i64, uri: impl Into<String>) -> Self {
        Self {
            timestamp,
            method: default_method(),
            uri: uri.into(),
            body: None,
            headers: BTreeMap::new(),
        }
    }
}

/// Source of historical requests
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Requests of `app` captured inside `window`, in capture order
    async fn load_slice(&self, app: &str, window: &ReplayWindow)
        -> CoreResult<Vec<ReplayRequest>>;
}

/// In-memory store, mostly for tests and local runs
#[derive(Debug, Clone, Default)]
pub struct MemoryRequestStore {
    requests: HashMap<String, Vec<ReplayRequest>>,
}

impl MemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, app: impl Into<String>, request: ReplayRequest) {
        self.requests.entry(app.into()).or_default().push(request);
    }

    pub fn with_requests(
        mut self,
        app: impl Into<String>,
        requests: impl IntoIterator<Item = ReplayRequest>,
    ) -> Self {
        self.requests.entry(app.into()).or_default().extend(requests);
        self
    }
}

#[async_trait]
impl RequestStore for MemoryRequestStore {
    async fn load_slice(
        &self,
        app: &str,
        window: &ReplayWindow,
    ) -> CoreResult<Vec<ReplayRequest>> {
        Ok(self
            .requests
            .get(app)
            .map(|requests| {
                requests
                    .iter()
                    .filter(|r| window.contains(r.timestamp))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Store reading `<root>/<app>.jsonl`, one JSON request per line
#[derive(Debug, Clone)]
pub struct JsonLinesRequestStore {
    root: PathBuf,
}

impl JsonLinesRequestStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, app: &str) -> PathBuf {
        self.root.join(format!("{}.jsonl", app))
    }
}

#[async_trait]
impl RequestStore for JsonLinesRequestStore {
    async fn load_slice(
        &self,
        app: &str,
        window: &ReplayWindow,
    ) -> CoreResult<Vec<ReplayRequest>> {
        let path = self.path_for(app);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(app = %app, path = %path.display(), "No request log for app");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut slice = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let request: ReplayRequest = serde_json::from_str(line).map_err(|e| {
                CoreError::store(app, format!("line {}: {}", line_no + 1, e))
            })?;
            if window.contains(request.timestamp) {
                slice.push(request);
            }
        }

        debug!(app = %app, requests = slice.len(), "Loaded request slice");
        Ok(slice)
    }
}
