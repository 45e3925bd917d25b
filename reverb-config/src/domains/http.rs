//! Replay transport configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};

/// How replayed requests reach the target.
///
/// `timeout` is the transport deadline of one replayed request; hitting it
/// is what the worker tallies as a timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub timeout: Duration,

    /// Connection establishment limit, capped at `timeout`
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub connect_timeout: Duration,

    pub user_agent: String,

    /// Redirects followed per request; replayed traffic normally
    /// expects the raw response, so the default is none
    pub max_redirects: u32,

    /// Idle keep-alive connections kept per target host
    pub pool_idle_per_host: usize,

    /// Accept any certificate when false (staging targets)
    pub verify_ssl: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            user_agent: format!("reverb/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 0,
            pool_idle_per_host: 8,
            verify_ssl: true,
        }
    }
}

impl Validatable for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.timeout.as_secs(), "timeout", self.domain_name())?;
        validate_required_string(&self.user_agent, "user_agent", self.domain_name())
    }

    fn domain_name(&self) -> &'static str {
        "http"
    }
}
