//! Uniform tool result shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one tool execution, whichever handler produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResult {
    Ok { data: Value },
    Error { error_message: String },
}

impl ToolResult {
    pub fn ok(data: Value) -> Self {
        Self::Ok { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error_message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Ok { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Ok { .. } => None,
            Self::Error { error_message } => Some(error_message),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_status_tag() {
        assert_eq!(
            serde_json::to_value(ToolResult::ok(json!([1, 2]))).unwrap(),
            json!({ "status": "ok", "data": [1, 2] })
        );
        assert_eq!(
            serde_json::to_value(ToolResult::error("unknown tool")).unwrap(),
            json!({ "status": "error", "error_message": "unknown tool" })
        );
    }

    #[test]
    fn accessors() {
        let ok = ToolResult::ok(json!({ "n": 1 }));
        assert!(ok.is_ok());
        assert_eq!(ok.data(), Some(&json!({ "n": 1 })));
        assert!(ok.error_message().is_none());

        let err = ToolResult::error("boom");
        assert!(!err.is_ok());
        assert_eq!(err.error_message(), Some("boom"));
    }
}
