//! Consumer worker pacing and budget configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};

/// Consumer worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Hard wall-clock budget of one worker invocation
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_execution_budget"
    )]
    pub execution_budget: Duration,

    /// Part of the budget kept free for metric emission and shutdown
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_budget_safety_margin"
    )]
    pub budget_safety_margin: Duration,

    /// Upper bound of the uniform random delay added between requests
    #[serde(
        rename = "delay_jitter_max_ms",
        with = "crate::domains::utils::serde_duration_ms",
        default = "default_delay_jitter_max"
    )]
    pub delay_jitter_max: Duration,

    /// Fixed delay between requests; derived from the window when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_delay_per_request_ms: Option<u64>,

    /// Worker identity reported in metric dimensions
    #[serde(default = "default_worker_name")]
    pub worker_name: String,
}

impl WorkerConfig {
    /// Budget left for replaying requests
    pub fn usable_budget(&self) -> Duration {
        self.execution_budget
            .saturating_sub(self.budget_safety_margin)
    }

    pub fn default_delay_per_request(&self) -> Option<Duration> {
        self.default_delay_per_request_ms.map(Duration::from_millis)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            execution_budget: default_execution_budget(),
            budget_safety_margin: default_budget_safety_margin(),
            delay_jitter_max: default_delay_jitter_max(),
            default_delay_per_request_ms: None,
            worker_name: default_worker_name(),
        }
    }
}

impl Validatable for WorkerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(
            self.execution_budget.as_secs(),
            "execution_budget",
            self.domain_name(),
        )?;
        if self.budget_safety_margin >= self.execution_budget {
            return Err(self.validation_error(format!(
                "budget_safety_margin ({}s) must be smaller than execution_budget ({}s)",
                self.budget_safety_margin.as_secs(),
                self.execution_budget.as_secs()
            )));
        }
        validate_required_string(&self.worker_name, "worker_name", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "worker"
    }
}

fn default_execution_budget() -> Duration {
    Duration::from_secs(300)
}

fn default_budget_safety_margin() -> Duration {
    Duration::from_secs(5)
}

fn default_delay_jitter_max() -> Duration {
    Duration::from_millis(10)
}

fn default_worker_name() -> String {
    "reverb-consumer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_config_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.usable_budget(), Duration::from_secs(295));
        assert_eq!(config.delay_jitter_max, Duration::from_millis(10));
        assert!(config.default_delay_per_request().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_margin_must_fit_in_budget() {
        let config = WorkerConfig {
            execution_budget: Duration::from_secs(5),
            budget_safety_margin: Duration::from_secs(5),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_jitter_reads_milliseconds() {
        let config: WorkerConfig =
            serde_yaml::from_str("delay_jitter_max_ms: 250\nexecution_budget: 60\n").unwrap();
        assert_eq!(config.delay_jitter_max, Duration::from_millis(250));
        assert_eq!(config.execution_budget, Duration::from_secs(60));
    }
}
