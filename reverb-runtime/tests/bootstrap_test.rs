//! Runtime bootstrap against the process environment

use reverb_config::{ConfigLoader, CONF_PATH_ENV_VAR};
use reverb_runtime::{Runtime, STORE_PATH_ENV_VAR};
use temp_env::with_vars;
use tempfile::TempDir;

const DOCUMENT: &str = r#"
config:
  env_vars_to_get: [region, stage]
  debug:
    stage:
      dev: true
      prod: false
plugins:
  metrics:
    stage:
      dev: recording_metrics
      prod: log_metrics
"#;

#[test]
fn test_bootstrap_wires_configured_plugins() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("reverb-bootstrap.yml"), DOCUMENT).unwrap();
    let template = format!("{}/{{}}", dir.path().display());
    let store = dir.path().join("requests");
    let store = store.to_string_lossy().into_owned();

    with_vars(
        vec![
            ("stage", Some("dev")),
            ("region", Some("us-east-1")),
            (CONF_PATH_ENV_VAR, Some(template.as_str())),
            (STORE_PATH_ENV_VAR, Some(store.as_str())),
        ],
        || {
            let runtime =
                Runtime::bootstrap_with(&ConfigLoader::new().with_file_name("reverb-bootstrap.yml"))
                    .unwrap();

            assert_eq!(runtime.config().stage, "dev");
            assert!(runtime.config().debug());
            assert!(runtime.plugins().exists("metrics"));
            assert_eq!(runtime.plugins().loaded_count(), 0);
            assert_eq!(
                runtime.plugins().module_path("metrics"),
                Some("plugins.recording_metrics")
            );
        },
    );
}

#[test]
fn test_bootstrap_fails_on_unknown_module() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("reverb-bad-plugin.yml"),
        "config: {}\nplugins:\n  metrics: statsd_metrics\n",
    )
    .unwrap();
    let template = format!("{}/{{}}", dir.path().display());

    with_vars(
        vec![
            ("stage", Some("dev")),
            ("region", Some("us-east-1")),
            (CONF_PATH_ENV_VAR, Some(template.as_str())),
        ],
        || {
            let err = Runtime::bootstrap_with(
                &ConfigLoader::new().with_file_name("reverb-bad-plugin.yml"),
            )
            .err()
            .unwrap();

            let message = format!("{:#}", err);
            assert!(message.contains("plugins.statsd_metrics"), "{}", message);
        },
    );
}
