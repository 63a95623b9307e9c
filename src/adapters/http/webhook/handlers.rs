//! HTTP handlers for webhook endpoints.
//!
//! One parameterized handler serves every provider; the path segment selects
//! the provider's application handler.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::{error, info, warn};

use crate::application::handlers::webhook::{
    HandleProviderWebhookCommand, HandleProviderWebhookHandler, HandleProviderWebhookResult,
};
use crate::domain::webhook::{ProviderTag, WebhookError};

use super::dto::{ErrorResponse, HealthResponse, WebhookAck};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state: one webhook handler per configured provider.
#[derive(Clone)]
pub struct WebhookAppState {
    handlers: Arc<HashMap<ProviderTag, Arc<HandleProviderWebhookHandler>>>,
}

impl WebhookAppState {
    /// Registers handlers under the tag of the profile each was built with.
    pub fn new(handlers: impl IntoIterator<Item = HandleProviderWebhookHandler>) -> Self {
        let handlers = handlers
            .into_iter()
            .map(|handler| (handler.profile().tag, Arc::new(handler)))
            .collect();
        Self {
            handlers: Arc::new(handlers),
        }
    }

    /// Looks up the handler for a path segment such as `sellix`.
    pub fn handler_for(&self, provider: &str) -> Option<Arc<HandleProviderWebhookHandler>> {
        let tag: ProviderTag = provider.parse().ok()?;
        self.handlers.get(&tag).cloned()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/:provider
pub async fn handle_provider_webhook(
    State(state): State<WebhookAppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, WebhookApiError> {
    let handler = state
        .handler_for(&provider)
        .ok_or(WebhookApiError::UnknownProvider)?;
    let profile = handler.profile();

    let body = body.map_err(|rejection| {
        warn!(provider = %profile.tag, error = %rejection, "Webhook body rejected");
        WebhookApiError::Body(rejection)
    })?;

    let signature = headers
        .get(profile.signature_header)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandleProviderWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    match handler.handle(cmd).await {
        Ok(HandleProviderWebhookResult::OrderCreated {
            order_number,
            stock_decremented,
            ..
        }) => {
            info!(
                provider = %profile.tag,
                order_number = %order_number,
                stock_decremented,
                "Webhook processed"
            );
        }
        Ok(HandleProviderWebhookResult::Ignored { reason }) => {
            info!(provider = %profile.tag, reason = ?reason, "Webhook acknowledged without changes");
        }
        Err(err) => {
            if err.is_retryable() {
                error!(provider = %profile.tag, error = %err, "Webhook processing failed");
            } else {
                warn!(provider = %profile.tag, error = %err, "Webhook rejected");
            }
            return Err(err.into());
        }
    }

    Ok((StatusCode::OK, Json(WebhookAck::processed())))
}

/// OPTIONS /webhooks/:provider
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook errors to HTTP responses.
#[derive(Debug)]
pub enum WebhookApiError {
    /// Path names no configured provider.
    UnknownProvider,
    /// Body could not be read, usually because it exceeds the size limit.
    Body(BytesRejection),
    Webhook(WebhookError),
}

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            WebhookApiError::UnknownProvider => {
                (StatusCode::NOT_FOUND, "Unknown payment provider".to_string())
            }
            WebhookApiError::Body(rejection) => match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => {
                    (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
                }
                status => (status, "Unreadable request body".to_string()),
            },
            WebhookApiError::Webhook(err) => (err.status_code(), err.public_message()),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStorefrontStore;
    use crate::application::handlers::webhook::OrderReconciler;
    use std::time::Duration;

    fn state() -> WebhookAppState {
        let reconciler = OrderReconciler::new(
            Arc::new(InMemoryStorefrontStore::new()),
            Duration::from_secs(5),
        );
        WebhookAppState::new(
            ProviderTag::ALL
                .into_iter()
                .map(|tag| HandleProviderWebhookHandler::new(tag.profile(), None, reconciler.clone())),
        )
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // State Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn handler_lookup_is_case_insensitive() {
        let state = state();

        assert!(state.handler_for("sellauth").is_some());
        assert!(state.handler_for("SELLIX").is_some());
        assert!(state.handler_for("stripe").is_none());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_provider_maps_to_not_found() {
        let response = WebhookApiError::UnknownProvider.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Unknown payment provider");
    }

    #[tokio::test]
    async fn storage_error_maps_to_internal_error_without_details() {
        let response =
            WebhookApiError::from(WebhookError::Storage("FATAL: password".to_string())).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to create order");
    }

    #[tokio::test]
    async fn invalid_signature_maps_to_unauthorized() {
        let response = WebhookApiError::from(WebhookError::InvalidSignature).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Invalid signature");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(body) = health().await;
        assert_eq!(body, HealthResponse::ok());
    }
}
