//! How bad a captured failure is

use serde::{Deserialize, Serialize};

/// Ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Low,
    #[default]
    Medium,
    /// The invocation failed and its event goes to the failure channel
    High,
    /// The invocation panicked
    Critical,
}

impl ErrorSeverity {
    /// Severity of an entry point failure
    pub fn for_invocation(panicked: bool) -> Self {
        if panicked {
            ErrorSeverity::Critical
        } else {
            ErrorSeverity::High
        }
    }

    pub fn should_alert(&self) -> bool {
        *self >= ErrorSeverity::High
    }
}
