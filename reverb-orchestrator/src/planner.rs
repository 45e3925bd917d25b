//! Per-tick replay planning

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use reverb_config::ResolvedConfig;
use reverb_core::{replay_start_epoch, AppOverride, AppParams, ReplayWindow, TestParams, WorkDescriptor};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::event::OrchestratorEvent;

/// Header marking every replayed request
pub const REPLAY_HEADER: &str = "x-reverb-replay";

/// Parameters in force for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurParams {
    pub apps_to_test: Vec<String>,
    /// Global defaults, exactly as received
    pub test_params: TestParams,
    /// Resolved parameters per application, in `apps_to_test` order
    pub apps: Vec<AppParams>,
    pub timezone: String,
    pub tick: u64,
}

/// Result of one scheduling tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayPlan {
    pub cur_params: CurParams,
    pub descriptors: Vec<WorkDescriptor>,
}

/// Computes replay windows and work descriptors
#[derive(Debug, Clone)]
pub struct Orchestrator {
    default_timezone: String,
    default_headers: BTreeMap<String, String>,
}

impl Orchestrator {
    pub fn new(default_timezone: impl Into<String>) -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert(REPLAY_HEADER.to_string(), "true".to_string());
        Self {
            default_timezone: default_timezone.into(),
            default_headers,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.config.timezone.clone())
    }

    /// Plan one tick: resolve every application's parameters and emit one
    /// descriptor per application.
    ///
    /// Overrides are checked up front; a malformed or unknown one fails the
    /// whole tick.
    pub fn plan_next_replay(&self, event: &OrchestratorEvent) -> OrchestratorResult<ReplayPlan> {
        let overrides = index_overrides(&event.apps_to_test, &event.overrides)?;
        let timezone = event
            .timezone
            .clone()
            .unwrap_or_else(|| self.default_timezone.clone());

        let mut apps = Vec::with_capacity(event.apps_to_test.len());
        let mut descriptors = Vec::with_capacity(event.apps_to_test.len());

        for app in &event.apps_to_test {
            let app_override = overrides.get(app.as_str());
            let params = match app_override {
                Some(entry) => entry.apply_to(&event.test_params),
                None => event.test_params.clone(),
            };

            let descriptor = self.describe(app, &params, &timezone, event.tick)?;
            tracing::debug!(
                app = %app,
                cur_timestamp = descriptor.cur_timestamp,
                rate = descriptor.rate,
                overridden = app_override.is_some(),
                "Planned replay window"
            );

            apps.push(AppParams {
                app: app.clone(),
                params,
                overridden: app_override.is_some(),
            });
            descriptors.push(descriptor);
        }

        tracing::info!(
            tick = event.tick,
            apps = descriptors.len(),
            "Planned replay tick"
        );

        Ok(ReplayPlan {
            cur_params: CurParams {
                apps_to_test: event.apps_to_test.clone(),
                test_params: event.test_params.clone(),
                apps,
                timezone,
                tick: event.tick,
            },
            descriptors,
        })
    }

    fn describe(
        &self,
        app: &str,
        params: &TestParams,
        timezone: &str,
        tick: u64,
    ) -> OrchestratorResult<WorkDescriptor> {
        let origin = replay_start_epoch(&params.replay_start_time, timezone)?;
        let window = ReplayWindow::for_tick(origin, params.loop_duration.saturating_mul(60), tick);

        let mut headers = self.default_headers.clone();
        headers.extend(params.headers.clone());

        Ok(WorkDescriptor {
            app: app.to_string(),
            cur_timestamp: window.start,
            window_secs: window.duration_secs,
            rate: params.rate,
            loop_duration: params.loop_duration,
            base_url: params.base_url.clone(),
            identifier: params.identifier.clone(),
            headers,
            tick,
        })
    }
}

/// First override per application, after validating every entry
fn index_overrides<'a>(
    apps_to_test: &[String],
    overrides: &'a [AppOverride],
) -> OrchestratorResult<BTreeMap<&'a str, &'a AppOverride>> {
    let mut indexed = BTreeMap::new();
    for (index, entry) in overrides.iter().enumerate() {
        let app = entry
            .app
            .as_deref()
            .filter(|app| !app.is_empty())
            .ok_or(OrchestratorError::MalformedOverride { index })?;

        if !apps_to_test.iter().any(|a| a == app) {
            return Err(OrchestratorError::UnknownApplication {
                index,
                app: app.to_string(),
            });
        }
        indexed.entry(app).or_insert(entry);
    }
    Ok(indexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const START: &str = "2018-6-18-17-06";

    fn event(overrides: serde_json::Value) -> OrchestratorEvent {
        OrchestratorEvent::from_value(json!({
            "apps_to_test": ["test-app1", "test-app2"],
            "test_params": {
                "rate": 23,
                "loop_duration": 19,
                "replay_start_time": START,
                "base_url": "http://reverb.example.com",
                "identifier": "qa"
            },
            "overrides": overrides,
            "timezone": "US/Pacific"
        }))
        .unwrap()
    }

    #[test]
    fn test_override_applies_to_matching_app_only() {
        let plan = Orchestrator::new("UTC")
            .plan_next_replay(&event(json!([{"app": "test-app1", "rate": 50}])))
            .unwrap();

        assert_eq!(plan.cur_params.test_params.rate, 23);
        assert_eq!(plan.descriptors[0].app, "test-app1");
        assert_eq!(plan.descriptors[0].rate, 50);
        assert_eq!(plan.descriptors[1].rate, 23);
        assert!(plan.cur_params.apps[0].overridden);
        assert!(!plan.cur_params.apps[1].overridden);
        assert_eq!(plan.descriptors[0].loop_duration, 19);
    }

    #[test]
    fn test_timestamp_not_before_replay_start() {
        let epoch = replay_start_epoch(START, "US/Pacific").unwrap();
        for tick in [0, 1, 7, 1000] {
            let mut e = event(json!([]));
            e.tick = tick;
            let plan = Orchestrator::new("UTC").plan_next_replay(&e).unwrap();
            for descriptor in &plan.descriptors {
                assert!(descriptor.cur_timestamp >= epoch);
            }
        }
    }

    #[test]
    fn test_successive_ticks_are_adjacent() {
        let orchestrator = Orchestrator::new("UTC");
        let mut e = event(json!([]));

        let first = orchestrator.plan_next_replay(&e).unwrap().descriptors[0].window();
        e.tick = 1;
        let second = orchestrator.plan_next_replay(&e).unwrap().descriptors[0].window();

        assert_eq!(first.duration_secs, 19 * 60);
        assert_eq!(second.start, first.end());
    }

    #[test]
    fn test_timezone_falls_back_to_configured_zone() {
        let mut e = event(json!([]));
        e.timezone = None;

        let plan = Orchestrator::new("UTC").plan_next_replay(&e).unwrap();
        assert_eq!(plan.cur_params.timezone, "UTC");
        assert_eq!(plan.descriptors[0].cur_timestamp, 1_529_341_560);
    }

    #[test]
    fn test_override_without_app_is_malformed() {
        let result = Orchestrator::new("UTC").plan_next_replay(&event(json!([
            {"app": "test-app2", "rate": 1},
            {"rate": 5}
        ])));
        assert!(matches!(
            result,
            Err(OrchestratorError::MalformedOverride { index: 1 })
        ));
    }

    #[test]
    fn test_override_for_unknown_app() {
        let result = Orchestrator::new("UTC")
            .plan_next_replay(&event(json!([{"app": "other", "rate": 5}])));
        match result {
            Err(OrchestratorError::UnknownApplication { app, .. }) => assert_eq!(app, "other"),
            other => panic!("expected UnknownApplication, got {:?}", other),
        }
    }

    #[test]
    fn test_replay_header_merges_with_app_headers() {
        let plan = Orchestrator::new("UTC")
            .plan_next_replay(&event(json!([
                {"app": "test-app1", "headers": {"x-tenant": "blue"}}
            ])))
            .unwrap();

        let headers = &plan.descriptors[0].headers;
        assert_eq!(headers[REPLAY_HEADER], "true");
        assert_eq!(headers["x-tenant"], "blue");
        assert_eq!(plan.descriptors[1].headers.len(), 1);
    }

    #[test]
    fn test_invalid_start_time_fails_plan() {
        let mut e = event(json!([]));
        e.test_params.replay_start_time = "yesterday".to_string();
        assert!(matches!(
            Orchestrator::new("UTC").plan_next_replay(&e),
            Err(OrchestratorError::Core(_))
        ));
    }

    #[test]
    fn test_zero_duration_and_negative_rate_pass_through() {
        let plan = Orchestrator::new("UTC")
            .plan_next_replay(&event(json!([
                {"app": "test-app1", "loop_duration": 0},
                {"app": "test-app2", "rate": -1}
            ])))
            .unwrap();

        assert_eq!(plan.descriptors[0].window_secs, 0);
        assert_eq!(plan.descriptors[0].request_budget(), 0);
        assert_eq!(plan.descriptors[1].rate, -1);
        assert_eq!(plan.descriptors[1].request_budget(), 0);
    }
}
