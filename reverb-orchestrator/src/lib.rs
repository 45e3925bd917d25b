//! Replay orchestration
//!
//! One scheduling tick turns an [`OrchestratorEvent`] (global defaults,
//! per-app overrides, tick number) into a [`ReplayPlan`]: the resolved
//! parameters of every application and one [`reverb_core::WorkDescriptor`]
//! per application, ready for fan-out to consumer workers.

pub mod error;
pub mod event;
pub mod planner;

pub use error::{OrchestratorError, OrchestratorResult};
pub use event::OrchestratorEvent;
pub use planner::{CurParams, Orchestrator, ReplayPlan, REPLAY_HEADER};
