//! Axum router configuration for webhook endpoints.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use http::{header, HeaderName, Method};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{handle_provider_webhook, health, preflight, WebhookAppState};

/// Request limits applied to the whole router.
#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Create the webhook routes without middleware.
///
/// # Routes
/// - `POST /webhooks/:provider` - Handle a provider webhook
/// - `OPTIONS /webhooks/:provider` - CORS preflight
/// - `GET /health` - Liveness probe
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new()
        .route(
            "/webhooks/:provider",
            post(handle_provider_webhook).options(preflight),
        )
        .route("/health", get(health))
}

/// CORS policy shared by every response.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

/// Create the complete, stateful webhook router.
///
/// Adds request ids, tracing, a request timeout, the body limit and CORS.
pub fn webhook_router(state: WebhookAppState, limits: HttpLimits) -> Router {
    webhook_routes()
        .layer(DefaultBodyLimit::max(limits.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(limits.request_timeout))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStorefrontStore;
    use crate::application::handlers::webhook::{HandleProviderWebhookHandler, OrderReconciler};
    use crate::domain::webhook::ProviderTag;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> WebhookAppState {
        let reconciler = OrderReconciler::new(
            Arc::new(InMemoryStorefrontStore::new()),
            Duration::from_secs(5),
        );
        WebhookAppState::new(ProviderTag::ALL.into_iter().map(|tag| {
            HandleProviderWebhookHandler::new(
                tag.profile(),
                Some(SecretString::new("whsec_test".to_string())),
                reconciler.clone(),
            )
        }))
    }

    fn app() -> Router {
        webhook_router(state(), HttpLimits::default())
    }

    // ───────────────────────────────────────────────────────────────
    // Routing
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn unknown_provider_returns_not_found() {
        let response = app()
            .oneshot(
                Request::post("/webhooks/stripe")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unsigned_post_is_unauthorized() {
        let response = app()
            .oneshot(
                Request::post("/webhooks/sellauth")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_on_webhook_path_is_not_allowed() {
        let response = app()
            .oneshot(Request::get("/webhooks/sellauth").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    // ───────────────────────────────────────────────────────────────
    // Middleware
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn preflight_is_answered_with_cors_headers() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/webhooks/sellix")
                    .header("origin", "https://shop.example")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let allowed = headers["access-control-allow-headers"].to_str().unwrap();
        assert!(allowed.contains("x-client-info"));
        assert!(allowed.contains("apikey"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn preflight_route_answers_without_middleware() {
        let response = webhook_routes()
            .with_state(state())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/webhooks/sellauth")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn error_responses_carry_cors_origin() {
        let response = app()
            .oneshot(
                Request::post("/webhooks/sellauth")
                    .header("origin", "https://shop.example")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_with_json_error() {
        let limits = HttpLimits {
            max_body_bytes: 1024,
            ..Default::default()
        };
        let response = webhook_router(state(), limits)
            .oneshot(
                Request::post("/webhooks/sellauth")
                    .header("x-webhook-signature", "00")
                    .body(Body::from(vec![b'a'; 4096]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Payload too large");
    }
}
