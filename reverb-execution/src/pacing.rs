//! Request pacing and budget fitting

use rand::Rng;
use std::time::Duration;

use reverb_core::ReplayWindow;

/// Delay policy for one slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPlan {
    pub delay_per_request: Duration,
    pub jitter_max: Duration,
}

impl PacingPlan {
    /// Pacing for `len` requests.
    ///
    /// Without an explicit delay the requests are spread over the shorter of
    /// the historical window and `replay_span`, the part of the budget that
    /// can be spent on pacing. Over the window the base delay is
    /// `window / len` minus half the jitter bound, so the mean interval
    /// covers the window. Over `replay_span` the full jitter bound is taken
    /// off, so even the slowest draw fits. Floored at zero.
    pub fn derive(
        window: &ReplayWindow,
        len: usize,
        jitter_max: Duration,
        explicit_delay: Option<Duration>,
        replay_span: Duration,
    ) -> Self {
        let delay_per_request = match explicit_delay {
            Some(delay) => delay,
            None if len == 0 => Duration::ZERO,
            None => {
                let window = Duration::from_secs(window.duration_secs);
                if window <= replay_span {
                    share(window, len).saturating_sub(jitter_max / 2)
                } else {
                    share(replay_span, len).saturating_sub(jitter_max)
                }
            }
        };

        Self {
            delay_per_request,
            jitter_max,
        }
    }

    /// Longest pacing interval: base delay plus full jitter
    pub fn worst_case_per_request(&self) -> Duration {
        self.delay_per_request + self.jitter_max
    }

    /// Largest prefix of `len` requests whose worst-case pacing fits in
    /// `budget`. Slow transport calls are left to the worker's deadline.
    pub fn fit_to_budget(&self, len: usize, budget: Duration) -> usize {
        let worst = self.worst_case_per_request().as_nanos();
        if worst == 0 {
            return len;
        }
        let fitting = budget.as_nanos() / worst;
        len.min(usize::try_from(fitting).unwrap_or(usize::MAX))
    }
}

fn share(span: Duration, len: usize) -> Duration {
    let nanos = span.as_nanos() / len as u128;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

/// Draws the delay before the next request
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay_per_request: Duration,
    jitter_max: Duration,
}

impl Pacer {
    pub fn new(delay_per_request: Duration, jitter_max: Duration) -> Self {
        Self {
            delay_per_request,
            jitter_max,
        }
    }

    /// `delay_per_request + uniform(0, jitter_max)`
    pub fn next_delay(&self) -> Duration {
        let jitter_micros = self.jitter_max.as_micros() as u64;
        let jitter = if jitter_micros == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_micros)
        };
        self.delay_per_request + Duration::from_micros(jitter)
    }
}
