//! One-level stage resolution for configuration mappings

use serde_yaml::{Mapping, Value};

use crate::error::{ConfigError, ConfigResult};

const STAGE_KEY: &str = "stage";

/// Replace every stage-keyed entry of `mapping` with its value for `stage`.
///
/// An entry is stage-keyed when its value is a mapping holding a `stage`
/// key: `{stage: {prod: 1, test: 2}}` resolves to `2` under `test`. Only
/// the top level of `mapping` is inspected.
pub fn resolve_stage(mapping: &Mapping, stage: &str) -> ConfigResult<Mapping> {
    let mut resolved = Mapping::with_capacity(mapping.len());

    for (key, value) in mapping {
        let value = match value {
            Value::Mapping(inner) if inner.contains_key(STAGE_KEY) => {
                select_stage(key, &inner[STAGE_KEY], stage)?
            }
            other => other.clone(),
        };
        resolved.insert(key.clone(), value);
    }

    Ok(resolved)
}

fn select_stage(key: &Value, by_stage: &Value, stage: &str) -> ConfigResult<Value> {
    let key_name = key_name(key);
    let Value::Mapping(by_stage) = by_stage else {
        return Err(ConfigError::DomainError {
            domain: key_name,
            message: "'stage' must map stage names to values".to_string(),
        });
    };

    by_stage
        .get(stage)
        .cloned()
        .ok_or_else(|| ConfigError::StageValueMissing {
            key: key_name,
            stage: stage.to_string(),
        })
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "<key>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_resolves_stage_keyed_values() {
        let conf = mapping(
            r#"
debug:
  stage:
    prod: false
    test: true
plugins_location: plugins
nested:
  inner: 1
"#,
        );

        let resolved = resolve_stage(&conf, "test").unwrap();
        assert_eq!(resolved["debug"], Value::Bool(true));
        assert_eq!(resolved["plugins_location"], Value::from("plugins"));
        assert_eq!(resolved["nested"]["inner"], Value::from(1));

        let prod = resolve_stage(&conf, "prod").unwrap();
        assert_eq!(prod["debug"], Value::Bool(false));
    }

    #[test]
    fn test_result_has_no_stage_keys() {
        let conf = mapping(
            r#"
metrics:
  stage:
    prod: cloudwatch
    test: log_metrics
timeout:
  stage:
    test:
      seconds: 3
"#,
        );

        let resolved = resolve_stage(&conf, "test").unwrap();
        assert_eq!(resolved["metrics"], Value::from("log_metrics"));
        for (_, value) in &resolved {
            if let Value::Mapping(inner) = value {
                assert!(!inner.contains_key("stage"));
            }
        }
    }

    #[test]
    fn test_missing_stage_entry_is_an_error() {
        let conf = mapping("debug:\n  stage:\n    prod: true\n");
        match resolve_stage(&conf, "dev") {
            Err(ConfigError::StageValueMissing { key, stage }) => {
                assert_eq!(key, "debug");
                assert_eq!(stage, "dev");
            }
            other => panic!("expected StageValueMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_stage_must_be_a_mapping() {
        let conf = mapping("debug:\n  stage: prod\n");
        assert!(matches!(
            resolve_stage(&conf, "prod"),
            Err(ConfigError::DomainError { .. })
        ));
    }
}
