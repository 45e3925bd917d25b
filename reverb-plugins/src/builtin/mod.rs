//! Built-in metrics emitters

pub mod log_metrics;
pub mod recording_metrics;
