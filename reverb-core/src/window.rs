//! Historical replay windows

use serde::{Deserialize, Serialize};

/// Half-open window `[start, start + duration_secs)` of historical traffic,
/// in epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayWindow {
    pub start: i64,
    pub duration_secs: u64,
}

impl ReplayWindow {
    pub fn new(start: i64, duration_secs: u64) -> Self {
        Self {
            start,
            duration_secs,
        }
    }

    /// Window number `tick` after the one starting at `origin`.
    ///
    /// Successive ticks produce adjacent windows that never overlap.
    pub fn for_tick(origin: i64, duration_secs: u64, tick: u64) -> Self {
        let offset = duration_secs.saturating_mul(tick);
        let start = origin.saturating_add(i64::try_from(offset).unwrap_or(i64::MAX));
        Self::new(start, duration_secs)
    }

    pub fn end(&self) -> i64 {
        self.start
            .saturating_add(i64::try_from(self.duration_secs).unwrap_or(i64::MAX))
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.duration_secs == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_are_adjacent_and_disjoint() {
        let origin = 1_529_366_760;
        let first = ReplayWindow::for_tick(origin, 60, 0);
        let second = ReplayWindow::for_tick(origin, 60, 1);

        assert_eq!(first.start, origin);
        assert_eq!(first.end(), second.start);
        assert!(first.contains(origin + 59));
        assert!(!first.contains(second.start));
    }

    #[test]
    fn test_zero_duration_window_is_empty() {
        let window = ReplayWindow::for_tick(100, 0, 7);
        assert!(window.is_empty());
        assert_eq!(window.start, 100);
        assert!(!window.contains(100));
    }
}
