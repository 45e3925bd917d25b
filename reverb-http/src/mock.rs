//! Scripted transport for exercising workers without a network

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

use crate::client::Transport;
use crate::errors::HttpError;
use crate::types::{OutboundRequest, ReplayResponse};

/// Result of one scripted call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedOutcome {
    Status(u16),
    Timeout,
    Failure(String),
}

/// Transport answering by call position.
///
/// Calls are numbered from 1; unscripted calls answer `200`. Every request
/// is recorded in order.
#[derive(Debug)]
pub struct ScriptedTransport {
    script: HashMap<usize, ScriptedOutcome>,
    latency: Duration,
    timeout: Duration,
    sent: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            script: HashMap::new(),
            latency: Duration::ZERO,
            timeout: Duration::from_secs(5),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Answer call number `call` (1-based) with `outcome`
    pub fn on_call(mut self, call: usize, outcome: ScriptedOutcome) -> Self {
        self.script.insert(call, outcome);
        self
    }

    /// Sleep this long inside every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().len()
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<ReplayResponse, HttpError> {
        let call = {
            let mut sent = self.sent.lock();
            sent.push(request.clone());
            sent.len()
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.script.get(&call) {
            None => Ok(ReplayResponse {
                status: 200,
                elapsed: self.latency,
            }),
            Some(ScriptedOutcome::Status(status)) => Ok(ReplayResponse {
                status: *status,
                elapsed: self.latency,
            }),
            Some(ScriptedOutcome::Timeout) => Err(HttpError::Timeout {
                url: request.url.clone(),
                timeout: self.timeout,
            }),
            Some(ScriptedOutcome::Failure(message)) => Err(HttpError::NetworkError {
                url: request.url.clone(),
                message: message.clone(),
            }),
        }
    }

    fn request_timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;

    #[tokio::test]
    async fn test_script_by_call_position() {
        let transport = ScriptedTransport::new()
            .on_call(2, ScriptedOutcome::Timeout)
            .on_call(3, ScriptedOutcome::Status(500));
        let request = OutboundRequest::new(HttpMethod::Get, "http://target/a");

        assert_eq!(transport.send(&request).await.unwrap().status, 200);
        assert!(transport.send(&request).await.unwrap_err().is_timeout());
        assert_eq!(transport.send(&request).await.unwrap().status, 500);
        assert_eq!(transport.call_count(), 3);
    }
}
