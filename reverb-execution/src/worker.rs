//! Sequential, paced replay of one request slice

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use reverb_core::{ReplayRequest, SliceTally};
use reverb_http::{HttpError, HttpMethod, OutboundRequest, ReplayResponse, Transport};

use crate::pacing::Pacer;

/// Replays a slice through a [`Transport`].
///
/// Requests go out one at a time in slice order. A failed request is
/// classified and counted; it never stops the slice.
pub struct ConsumerWorker {
    transport: Arc<dyn Transport>,
    base_url: String,
    deadline: Option<Instant>,
}

impl ConsumerWorker {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            deadline: None,
        }
    }

    /// Stop issuing requests that could not finish before `deadline`
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Replay `slice`, waiting `delay_per_request + uniform(0, delay_jitter_max)`
    /// between consecutive requests.
    ///
    /// `attempted + truncated` always equals the slice length; requests are
    /// only truncated when the deadline would otherwise be overrun.
    pub async fn execute(
        &self,
        app: &str,
        slice: &[ReplayRequest],
        delay_per_request: Duration,
        delay_jitter_max: Duration,
        headers: &BTreeMap<String, String>,
    ) -> SliceTally {
        let pacer = Pacer::new(delay_per_request, delay_jitter_max);
        let request_timeout = self.transport.request_timeout();
        let mut tally = SliceTally::default();

        for (index, request) in slice.iter().enumerate() {
            let delay = if index > 0 {
                pacer.next_delay()
            } else {
                Duration::ZERO
            };
            if !self.has_room_for(delay + request_timeout) {
                tally.truncated = slice.len() - index;
                warn!(
                    app = %app,
                    truncated = tally.truncated,
                    "Execution budget exhausted, truncating slice"
                );
                break;
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            tally.attempted += 1;
            match self.issue(request, headers).await {
                Ok(response) if response.is_error_status() => {
                    debug!(app = %app, uri = %request.uri, status = response.status, "Error status");
                    tally.error_statuses += 1;
                }
                Ok(_) => {}
                Err(e) if e.is_timeout() => {
                    debug!(app = %app, uri = %request.uri, "Request timed out");
                    tally.timeouts += 1;
                }
                Err(e) => {
                    debug!(app = %app, uri = %request.uri, error = %e, "Request failed");
                    tally.exceptions += 1;
                }
            }
        }

        tally
    }

    fn has_room_for(&self, needed: Duration) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() + needed <= deadline,
            None => true,
        }
    }

    async fn issue(
        &self,
        request: &ReplayRequest,
        headers: &BTreeMap<String, String>,
    ) -> Result<ReplayResponse, HttpError> {
        let method: HttpMethod = request.method.parse()?;
        let outbound = OutboundRequest::new(method, join_url(&self.base_url, &request.uri))
            .with_headers(&request.headers)
            .with_headers(headers)
            .with_body(request.body.clone());
        self.transport.send(&outbound).await
    }
}

/// Resolve a captured URI against the target base URL.
///
/// Absolute URIs are replayed unchanged.
pub fn join_url(base_url: &str, uri: &str) -> String {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return uri.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        uri.trim_start_matches('/')
    )
}
