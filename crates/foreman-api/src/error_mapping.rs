// SPDX-License-Identifier: Apache-2.0

use foreman_engine::EngineError;
use serde::Serialize;
use serde_json::Value;

/// The wire error shape: `{"error": "..."}` with optional `details`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Maps engine errors onto HTTP statuses. Storage failures get a generic
/// body; their message is for the log line, not the client.
#[must_use]
pub fn map_engine_error(error: &EngineError) -> (u16, ErrorBody) {
    match error {
        EngineError::Validation(msg) | EngineError::Conflict(msg) => {
            (400, ErrorBody::new(msg.clone()))
        }
        EngineError::NotFound(msg) => (404, ErrorBody::new(msg.clone())),
        EngineError::Store(_) => (500, ErrorBody::new("Internal server error")),
        _ => (500, ErrorBody::new("Internal server error")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreman_store::{StoreError, StoreErrorCode};

    #[test]
    fn engine_errors_map_to_expected_statuses() {
        let (status, body) =
            map_engine_error(&EngineError::NotFound("Todo not found".to_string()));
        assert_eq!(status, 404);
        assert_eq!(body.error, "Todo not found");

        let (status, _) =
            map_engine_error(&EngineError::Validation("userId is required".to_string()));
        assert_eq!(status, 400);

        let (status, _) = map_engine_error(&EngineError::Conflict(
            "Cannot snooze completed or dismissed todos".to_string(),
        ));
        assert_eq!(status, 400);

        let (status, body) = map_engine_error(&EngineError::Store(StoreError::new(
            StoreErrorCode::Io,
            "disk on fire",
        )));
        assert_eq!(status, 500);
        assert_eq!(body.error, "Internal server error", "io detail is not leaked");
    }

    #[test]
    fn error_body_omits_absent_details() {
        let body = ErrorBody::new("Route not found");
        let out = serde_json::to_value(&body).expect("encode");
        assert_eq!(out, serde_json::json!({"error": "Route not found"}));

        let body = ErrorBody::new("Invalid todo").with_details(serde_json::json!(["priority"]));
        let out = serde_json::to_value(&body).expect("encode");
        assert_eq!(out["details"], serde_json::json!(["priority"]));
    }
}
