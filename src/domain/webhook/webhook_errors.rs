//! Webhook error types.
//!
//! Defines every failure a webhook delivery can end in, with HTTP status code
//! mapping and retryability semantics. Provider retry behavior keys off the
//! status: 2xx acknowledges, 4xx is final, 5xx triggers redelivery.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised while turning a raw payload into an [`OrderEvent`].
///
/// [`OrderEvent`]: super::OrderEvent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    /// Body is not a JSON object.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Amount present but not a non-negative number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Field required for a terminal event is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// Errors that end webhook processing with a non-success response.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature header absent or empty.
    #[error("Missing signature")]
    MissingSignature,

    /// No secret configured for the provider.
    #[error("Missing webhook secret")]
    MissingSecret,

    /// Signature does not match the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Body could not be parsed.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Amount field holds a non-numeric or negative value.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Required field missing from the payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Storage rejected or failed the operation.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Storage did not answer within the configured timeout.
    #[error("Storage timed out")]
    StorageTimeout,

    /// No storage credential configured; the store fails closed.
    #[error("Order store unavailable")]
    StoreUnavailable,

    /// Unexpected failure (panicked task, broken invariant).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    /// Returns true if the provider should redeliver this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Storage(_)
                | WebhookError::StorageTimeout
                | WebhookError::StoreUnavailable
                | WebhookError::Internal(_)
        )
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::MissingSecret
            | WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,

            WebhookError::MalformedPayload(_)
            | WebhookError::InvalidAmount(_)
            | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,

            WebhookError::Storage(_)
            | WebhookError::StorageTimeout
            | WebhookError::StoreUnavailable
            | WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// One-line message safe to return to the provider.
    ///
    /// Storage and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            WebhookError::MissingSignature | WebhookError::MissingSecret => {
                "Missing signature or webhook secret".to_string()
            }
            WebhookError::InvalidSignature => "Invalid signature".to_string(),
            WebhookError::MalformedPayload(_) => "Malformed payload".to_string(),
            WebhookError::InvalidAmount(_) => "Invalid amount".to_string(),
            WebhookError::MissingField(field) => format!("Missing field: {}", field),
            WebhookError::Storage(_) => "Failed to create order".to_string(),
            WebhookError::StorageTimeout => "Order store timed out".to_string(),
            WebhookError::StoreUnavailable => "Order store unavailable".to_string(),
            WebhookError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<NormalizationError> for WebhookError {
    fn from(err: NormalizationError) -> Self {
        match err {
            NormalizationError::MalformedPayload(msg) => WebhookError::MalformedPayload(msg),
            NormalizationError::InvalidAmount(msg) => WebhookError::InvalidAmount(msg),
            NormalizationError::MissingField(field) => WebhookError::MissingField(field),
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::StorageTimeout => WebhookError::StorageTimeout,
            ErrorCode::StoreUnavailable => WebhookError::StoreUnavailable,
            ErrorCode::DatabaseError => WebhookError::Storage(err.to_string()),
        }
    }
}
