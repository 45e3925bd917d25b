use crate::severity::ErrorSeverity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Structured description of one failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub error_type: String,
    pub message: String,
    pub severity: ErrorSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, JsonValue>,
    pub occurred_at: DateTime<Utc>,
}

impl ErrorInfo {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            severity: ErrorSeverity::Medium,
            stack_trace: None,
            context: BTreeMap::new(),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    pub fn with_context_value(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.context.insert(key.into(), json_value);
        }
        self
    }

    /// Emit as one `error` event
    pub fn log(&self) {
        let context = serde_json::to_string(&self.context).unwrap_or_default();
        tracing::error!(
            error_type = %self.error_type,
            severity = ?self.severity,
            context = %context,
            stack_trace = self.stack_trace.as_deref().unwrap_or_default(),
            "{}",
            self.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_serialization() {
        let info = ErrorInfo::new("BoundaryError", "handler failed")
            .with_severity(ErrorSeverity::High)
            .with_stack_trace("0: frame")
            .with_context_value("handler", "consumer")
            .with_context_value("attempt", 1);

        assert!(info.severity.should_alert());
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["context"]["handler"], "consumer");
        assert_eq!(json["stack_trace"], "0: frame");
        assert_eq!(json["severity"], serde_json::to_value(ErrorSeverity::High).unwrap());

        let bare = serde_json::to_value(ErrorInfo::new("x", "y")).unwrap();
        assert!(bare.get("stack_trace").is_none());
        assert!(bare.get("context").is_none());
    }
}
