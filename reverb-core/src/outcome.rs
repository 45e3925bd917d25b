//! Replay outcomes produced by a consumer worker

use serde::{Deserialize, Serialize};

/// Aggregate counts for one replayed slice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceTally {
    /// Requests issued through the transport
    pub attempted: usize,
    /// Requests that hit the transport deadline
    pub timeouts: usize,
    /// Requests that failed for any other reason
    pub exceptions: usize,
    /// Requests answered with a 4xx/5xx status
    pub error_statuses: usize,
    /// Requests not issued because the execution budget ran out
    pub truncated: usize,
}

impl SliceTally {
    pub fn successes(&self) -> usize {
        self.attempted
            .saturating_sub(self.timeouts)
            .saturating_sub(self.exceptions)
    }
}

/// Immutable record of one replayed slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub app: String,
    pub identifier: String,
    /// Length of the slice handed to the worker
    pub num_requests: usize,
    pub tally: SliceTally,
    /// Wall-clock epoch minute the slice finished in
    pub mytime: i64,
    /// Metric resolution in seconds
    pub resolution: u32,
}

impl ReplayOutcome {
    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        format!(
            "app: {}, env: {} # reqs: {}, # timeouts: {}, # exceptions: {}",
            self.app, self.identifier, self.num_requests, self.tally.timeouts, self.tally.exceptions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_format() {
        let outcome = ReplayOutcome {
            app: "app".to_string(),
            identifier: "qa".to_string(),
            num_requests: 10,
            tally: SliceTally {
                attempted: 10,
                timeouts: 1,
                exceptions: 2,
                ..Default::default()
            },
            mytime: 0,
            resolution: 1,
        };

        assert_eq!(
            outcome.summary(),
            "app: app, env: qa # reqs: 10, # timeouts: 1, # exceptions: 2"
        );
        assert_eq!(outcome.tally.successes(), 7);
    }
}
