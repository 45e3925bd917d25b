//! Plugin type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of capability a plugin provides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    /// Metric record sink
    Metrics,
    /// Custom plugin type
    Custom(String),
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metrics => write!(f, "metrics"),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}
