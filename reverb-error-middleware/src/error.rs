//! Re-signalled boundary failure

use thiserror::Error;
use uuid::Uuid;

/// Failure escaping an entry point.
///
/// Displays as the full captured context: the error chain or panic
/// payload followed by a backtrace.
#[derive(Debug, Error)]
#[error("{trace}")]
pub struct BoundaryError {
    pub handler: String,
    pub request_id: Uuid,
    pub trace: String,
    pub panicked: bool,
}
