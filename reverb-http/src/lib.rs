//! Replay transport for Reverb
//!
//! The consumer worker issues requests through the [`Transport`] trait.
//! [`HttpManager`] is the reqwest-backed implementation; [`ScriptedTransport`]
//! answers from a per-call script and is used to exercise pacing and
//! outcome accounting without a network.

pub mod client;
pub mod errors;
pub mod mock;
pub mod types;

pub use client::{HttpManager, Transport};
pub use errors::HttpError;
pub use mock::{ScriptedOutcome, ScriptedTransport};
pub use types::{HttpMethod, HttpMethodError, OutboundRequest, ReplayResponse};
