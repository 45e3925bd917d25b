//! Runtime context handed to every entry point

use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// Identity and deadline of one invocation
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub function_name: String,
    pub request_id: Uuid,
    /// Wall-clock limit imposed by the invoking runtime
    pub deadline: Option<Instant>,
}

impl InvocationContext {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            request_id: Uuid::new_v4(),
            deadline: None,
        }
    }

    /// Deadline `budget` from now
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.deadline = Some(Instant::now() + budget);
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }
}
