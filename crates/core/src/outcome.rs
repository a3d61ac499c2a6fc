//! The structured response envelope shared by every adapter.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Uniform `{result, success, message}` envelope.
///
/// Every registered function commits to this shape at registration time, so
/// all three adapters can format responses the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallOutcome {
    /// Structured payload, if any.
    #[serde(default)]
    pub result: Option<Value>,

    /// Whether the invocation succeeded from the function's point of view.
    pub success: bool,

    /// Human-readable outcome summary.
    pub message: String,
}

impl CallOutcome {
    /// Create a successful outcome.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            result: None,
            success: true,
            message: message.into(),
        }
    }

    /// Attach a structured payload.
    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    /// Create a failed outcome.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result: None,
            success: false,
            message: message.into(),
        }
    }

    /// Interpret a handler's return value as an envelope.
    ///
    /// A value that already carries the envelope shape passes through
    /// unchanged; anything else is wrapped defensively and the message flags
    /// the wrap so it can be spotted downstream.
    pub fn from_return(value: Value) -> Self {
        match serde_json::from_value::<CallOutcome>(value.clone()) {
            Ok(outcome) => outcome,
            Err(_) => CallOutcome {
                result: Some(value),
                success: true,
                message: "unstructured return value wrapped by the adapter".to_string(),
            },
        }
    }

    /// Render as a JSON value.
    pub fn into_value(self) -> Value {
        json!({
            "result": self.result,
            "success": self.success,
            "message": self.message,
        })
    }
}

impl From<CallOutcome> for Value {
    fn from(outcome: CallOutcome) -> Self {
        outcome.into_value()
    }
}
