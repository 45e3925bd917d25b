//! One consumer invocation: load, cap, fit, replay, report

use chrono::Utc;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

use reverb_config::ResolvedConfig;
use reverb_core::{
    epoch_minute, BaseDimensions, ReplayOutcome, ReplayRequest, RequestStore, WorkDescriptor,
};
use reverb_http::Transport;
use reverb_plugin::PluginRegistry;

use crate::error::ExecutionResult;
use crate::metrics::emit_metrics;
use crate::pacing::PacingPlan;
use crate::worker::ConsumerWorker;

/// Executes work descriptors against a target
pub struct Consumer {
    config: Arc<ResolvedConfig>,
    plugins: Arc<PluginRegistry>,
    store: Arc<dyn RequestStore>,
    transport: Arc<dyn Transport>,
}

impl Consumer {
    pub fn new(
        config: Arc<ResolvedConfig>,
        plugins: Arc<PluginRegistry>,
        store: Arc<dyn RequestStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            plugins,
            store,
            transport,
        }
    }

    /// Replay the slice described by `descriptor`.
    ///
    /// The slice is capped at `rate × loop_duration` requests and then cut to
    /// what fits the execution budget; both the budget and `deadline` (less
    /// the safety margin) bound the replay.
    pub async fn run(
        &self,
        descriptor: &WorkDescriptor,
        deadline: Option<Instant>,
    ) -> ExecutionResult<ReplayOutcome> {
        let worker_config = &self.config.config.worker;
        let window = descriptor.window();

        let loaded = self.store.load_slice(&descriptor.app, &window).await?;
        let mut slice = cap_slice(loaded, descriptor.request_budget());
        let num_requests = slice.len();

        // The last request still needs its own timeout inside the budget
        let replay_span = worker_config
            .usable_budget()
            .saturating_sub(self.transport.request_timeout());
        let plan = PacingPlan::derive(
            &window,
            num_requests,
            worker_config.delay_jitter_max,
            worker_config.default_delay_per_request(),
            replay_span,
        );

        let fitting = plan.fit_to_budget(num_requests, worker_config.usable_budget());
        let budget_truncated = num_requests - fitting;
        if budget_truncated > 0 {
            warn!(
                app = %descriptor.app,
                requests = num_requests,
                fitting,
                "Slice does not fit the execution budget"
            );
            slice.truncate(fitting);
        }

        let started = Instant::now();
        let budget_deadline = started + worker_config.usable_budget();
        let effective_deadline = match deadline
            .and_then(|d| d.checked_sub(worker_config.budget_safety_margin))
        {
            Some(invocation) => invocation.min(budget_deadline),
            None if deadline.is_some() => started,
            None => budget_deadline,
        };

        let worker = ConsumerWorker::new(Arc::clone(&self.transport), &descriptor.base_url)
            .with_deadline(Some(effective_deadline));
        let mut tally = worker
            .execute(
                &descriptor.app,
                &slice,
                plan.delay_per_request,
                plan.jitter_max,
                &descriptor.headers,
            )
            .await;
        tally.truncated += budget_truncated;

        let outcome = ReplayOutcome {
            app: descriptor.app.clone(),
            identifier: descriptor.identifier.clone(),
            num_requests,
            tally,
            mytime: epoch_minute(Utc::now()),
            resolution: 1,
        };

        let base = BaseDimensions::new(
            self.config.stage.clone(),
            worker_config.worker_name.clone(),
            outcome.app.clone(),
            outcome.identifier.clone(),
            outcome.mytime,
        )
        .with_resolution(outcome.resolution);
        emit_metrics(
            &self.plugins,
            self.config.debug(),
            &base,
            outcome.num_requests as u64,
            outcome.tally.timeouts as u64,
            outcome.tally.exceptions as u64,
        )?;

        info!(
            app = %outcome.app,
            identifier = %outcome.identifier,
            attempted = outcome.tally.attempted,
            timeouts = outcome.tally.timeouts,
            exceptions = outcome.tally.exceptions,
            truncated = outcome.tally.truncated,
            "{}",
            outcome.summary()
        );

        Ok(outcome)
    }
}

/// At most `limit` requests, sampled at an even stride so the slice keeps
/// its order and spans the whole window
pub fn cap_slice(slice: Vec<ReplayRequest>, limit: usize) -> Vec<ReplayRequest> {
    let len = slice.len();
    if len <= limit {
        return slice;
    }
    if limit == 0 {
        return Vec::new();
    }

    let mut next_pick = 0usize;
    let mut picked = 0usize;
    slice
        .into_iter()
        .enumerate()
        .filter_map(|(index, request)| {
            if picked < limit && index == next_pick {
                picked += 1;
                next_pick = picked * len / limit;
                Some(request)
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverb_config::{EnvSnapshot, ReverbConfig};
    use reverb_core::MemoryRequestStore;
    use reverb_http::{ScriptedOutcome, ScriptedTransport};
    use reverb_plugin::METRICS_PLUGIN;
    use reverb_plugins::{builtin_catalog, RecordingMetrics};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn requests(start: i64, count: usize) -> Vec<ReplayRequest> {
        (0..count)
            .map(|i| ReplayRequest::get(start + i as i64, format!("/r/{}", i)))
            .collect()
    }

    fn descriptor(rate: i64) -> WorkDescriptor {
        WorkDescriptor {
            app: "app1".to_string(),
            cur_timestamp: 1_000,
            window_secs: 60,
            rate,
            loop_duration: 1,
            base_url: "http://target".to_string(),
            identifier: "qa".to_string(),
            headers: BTreeMap::new(),
            tick: 0,
        }
    }

    fn config(debug: bool, with_metrics: bool) -> Arc<ResolvedConfig> {
        let mut config = ReverbConfig::default();
        config.debug = debug;
        config.worker.default_delay_per_request_ms = Some(0);
        config.worker.delay_jitter_max = Duration::ZERO;
        let mut plugins = BTreeMap::new();
        if with_metrics {
            plugins.insert(METRICS_PLUGIN.to_string(), "recording_metrics".to_string());
        }
        Arc::new(ResolvedConfig {
            stage: "test".to_string(),
            env: EnvSnapshot::default(),
            config,
            plugins,
        })
    }

    fn consumer(
        config: Arc<ResolvedConfig>,
        store: MemoryRequestStore,
        transport: Arc<ScriptedTransport>,
    ) -> Consumer {
        let plugins = PluginRegistry::from_config(&config, &builtin_catalog()).unwrap();
        Consumer::new(config, Arc::new(plugins), Arc::new(store), transport)
    }

    #[test]
    fn test_cap_slice_samples_evenly() {
        let capped = cap_slice(requests(0, 10), 5);
        let uris: Vec<_> = capped.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris, vec!["/r/0", "/r/2", "/r/4", "/r/6", "/r/8"]);

        assert_eq!(cap_slice(requests(0, 3), 5).len(), 3);
        assert!(cap_slice(requests(0, 3), 0).is_empty());
        assert_eq!(cap_slice(requests(0, 7), 3).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_replays_window_and_emits_metrics() {
        let store = MemoryRequestStore::new()
            .with_requests("app1", requests(990, 5))
            .with_requests("app1", requests(1_000, 6));
        let transport = Arc::new(ScriptedTransport::new().on_call(2, ScriptedOutcome::Timeout));
        let consumer = consumer(config(true, true), store, transport.clone());

        let outcome = consumer.run(&descriptor(100), None).await.unwrap();

        assert_eq!(outcome.num_requests, 6);
        assert_eq!(outcome.tally.attempted, 6);
        assert_eq!(outcome.tally.timeouts, 1);
        assert_eq!(transport.call_count(), 6);
        assert_eq!(
            outcome.summary(),
            "app: app1, env: qa # reqs: 6, # timeouts: 1, # exceptions: 0"
        );

        let plugin = consumer.plugins.load(METRICS_PLUGIN).unwrap();
        let recorder = plugin.as_any().downcast_ref::<RecordingMetrics>().unwrap();
        let names: Vec<_> = recorder
            .records()
            .iter()
            .map(|r| r.name().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["num_requests", "num_requests", "timeouts"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_caps_slice() {
        let store = MemoryRequestStore::new().with_requests("app1", requests(1_000, 50));
        let transport = Arc::new(ScriptedTransport::new());
        let consumer = consumer(config(false, false), store, transport.clone());

        let outcome = consumer.run(&descriptor(10), None).await.unwrap();
        assert_eq!(outcome.num_requests, 10);
        assert_eq!(transport.call_count(), 10);

        let none = consumer.run(&descriptor(-5), None).await.unwrap();
        assert_eq!(none.num_requests, 0);
        assert_eq!(none.tally, Default::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_pacing_replays_long_window_in_budget() {
        let config = Arc::new(ResolvedConfig {
            stage: "test".to_string(),
            env: EnvSnapshot::default(),
            config: ReverbConfig::default(),
            plugins: BTreeMap::new(),
        });
        let cur = 1_529_366_760;
        let slice: Vec<_> = (0..437)
            .map(|i| ReplayRequest::get(cur + i as i64 * 2, format!("/r/{}", i)))
            .collect();
        let store = MemoryRequestStore::new().with_requests("app1", slice);
        let transport = Arc::new(ScriptedTransport::new());
        let consumer = consumer(config, store, transport.clone());

        let descriptor = WorkDescriptor {
            cur_timestamp: cur,
            window_secs: 19 * 60,
            rate: 23,
            loop_duration: 19,
            ..descriptor(0)
        };
        let started = Instant::now();
        let outcome = consumer.run(&descriptor, None).await.unwrap();

        assert_eq!(outcome.num_requests, 437);
        assert_eq!(outcome.tally.attempted, 437);
        assert_eq!(outcome.tally.truncated, 0);
        assert_eq!(transport.call_count(), 437);
        assert!(started.elapsed() <= Duration::from_secs(290));
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_fit_truncates_without_failing() {
        let mut config = (*config(false, false)).clone();
        config.config.worker.execution_budget = Duration::from_secs(20);
        config.config.worker.budget_safety_margin = Duration::from_secs(5);
        config.config.worker.default_delay_per_request_ms = Some(4_000);

        let store = MemoryRequestStore::new().with_requests("app1", requests(1_000, 8));
        // 4s per request; 15s usable
        let transport = Arc::new(ScriptedTransport::new().with_timeout(Duration::from_secs(4)));
        let consumer = consumer(Arc::new(config), store, transport.clone());

        let outcome = consumer.run(&descriptor(100), None).await.unwrap();
        assert_eq!(outcome.num_requests, 8);
        assert_eq!(outcome.tally.attempted, 3);
        assert_eq!(outcome.tally.truncated, 5);
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_sends_nothing() {
        let mut config = (*config(false, false)).clone();
        config.config.worker.default_delay_per_request_ms = Some(10);
        let store = MemoryRequestStore::new().with_requests("app1", requests(1_000, 4));
        let transport = Arc::new(ScriptedTransport::new());
        let consumer = consumer(Arc::new(config), store, transport.clone());

        // Inside the safety margin already
        let outcome = consumer
            .run(&descriptor(100), Some(Instant::now() + Duration::from_secs(1)))
            .await
            .unwrap();

        assert_eq!(outcome.num_requests, 4);
        assert_eq!(outcome.tally.attempted, 0);
        assert_eq!(outcome.tally.truncated, 4);
        assert_eq!(transport.call_count(), 0);
    }
}
