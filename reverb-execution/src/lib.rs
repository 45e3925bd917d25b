//! Consumer worker for Reverb
//!
//! A worker receives one [`reverb_core::WorkDescriptor`], loads the matching
//! slice of historical requests, replays it sequentially with jittered
//! pacing inside its execution budget, and reports aggregate counts to the
//! log and, when enabled, to the metrics capability.

pub mod consumer;
pub mod error;
pub mod metrics;
pub mod pacing;
pub mod worker;

pub use consumer::{cap_slice, Consumer};
pub use error::{ExecutionError, ExecutionResult};
pub use metrics::{build_metrics, emit_metrics};
pub use pacing::{Pacer, PacingPlan};
pub use worker::ConsumerWorker;
