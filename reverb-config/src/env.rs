//! Environment snapshot captured once per process

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{ConfigError, ConfigResult};

/// Values of the declared environment variables.
///
/// Variables that are not set are captured as empty strings so that
/// required-variable validation can name them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture `names` through `lookup`
    pub fn capture<I, S, F>(names: I, lookup: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let vars = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                (name.to_string(), lookup(name).unwrap_or_default())
            })
            .collect();
        Self { vars }
    }

    /// Capture `names` from the process environment
    pub fn from_process<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::capture(names, |name| std::env::var(name).ok())
    }

    /// Fail on the first required variable that is absent or empty
    pub fn require(&self, required: &[String]) -> ConfigResult<()> {
        for name in required {
            let present = self.vars.get(name).is_some_and(|v| !v.is_empty());
            if !present {
                return Err(ConfigError::MissingEnvVar { name: name.clone() });
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Deployment stage identifier
    pub fn stage(&self) -> ConfigResult<&str> {
        self.get("stage").ok_or_else(|| ConfigError::MissingEnvVar {
            name: "stage".to_string(),
        })
    }

    pub fn region(&self) -> Option<&str> {
        self.get("region")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.vars.iter()
    }
}
