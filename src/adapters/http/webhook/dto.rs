//! Response bodies for webhook endpoints.

use serde::{Deserialize, Serialize};

/// Acknowledgement sent for processed and ignored deliveries alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub message: String,
}

impl WebhookAck {
    pub fn processed() -> Self {
        Self {
            message: "Webhook processed successfully".to_string(),
        }
    }
}

/// Error body returned for every rejected delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_serializes_to_message_field() {
        let json = serde_json::to_string(&WebhookAck::processed()).unwrap();
        assert_eq!(json, r#"{"message":"Webhook processed successfully"}"#);
    }

    #[test]
    fn error_serializes_to_error_field() {
        let json = serde_json::to_string(&ErrorResponse::new("Invalid signature")).unwrap();
        assert_eq!(json, r#"{"error":"Invalid signature"}"#);
    }
}
