//! Process wiring and invocation entry points
//!
//! [`Runtime`] is built once per process and owns every long-lived
//! dependency. The two entry points take it explicitly together with the
//! opaque event payload and the invocation context, and run inside the
//! invocation boundary.

pub mod handlers;
pub mod runtime;

pub use handlers::{consumer_handler, orchestrator_handler};
pub use reverb_error_middleware::{BoundaryError, InvocationContext};
pub use runtime::{Runtime, DEFAULT_STORE_PATH, STORE_PATH_ENV_VAR};
