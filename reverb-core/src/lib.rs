//! Core domain models for Reverb
//!
//! This crate holds the types shared by the orchestrator, the consumer
//! worker and the runtime: test parameters and overrides, the work
//! descriptor handed across the dispatch boundary, replay outcomes,
//! metric records and the historical request store contract.

pub mod descriptor;
pub mod error;
pub mod metric;
pub mod outcome;
pub mod params;
pub mod store;
pub mod time;
pub mod window;

// Re-export commonly used types
pub use descriptor::WorkDescriptor;
pub use error::{CoreError, CoreResult};
pub use metric::{BaseDimensions, MetricRecord};
pub use outcome::{ReplayOutcome, SliceTally};
pub use params::{AppOverride, AppParams, TestParams};
pub use store::{JsonLinesRequestStore, MemoryRequestStore, ReplayRequest, RequestStore};
pub use time::{epoch_minute, parse_replay_start, replay_start_epoch};
pub use window::ReplayWindow;
