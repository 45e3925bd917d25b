//! Invocation boundary for Reverb entry points
//!
//! Every externally invoked handler runs inside [`invoke`] (or is wrapped
//! once with [`wrap`]). Successful results pass through untouched; an error
//! or a panic is logged with its full context and re-signalled as a
//! [`BoundaryError`] whose message is that context, so a dead-letter
//! consumer receives something diagnosable.

pub mod boundary;
pub mod context;
pub mod error;

pub use boundary::{invoke, wrap};
pub use context::InvocationContext;
pub use error::BoundaryError;
