//! HTTP adapter for payment provider webhooks.
//!
//! - `POST /webhooks/:provider` - Verify, normalize and reconcile a delivery
//! - `OPTIONS /webhooks/:provider` - CORS preflight
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, HealthResponse, WebhookAck};
pub use handlers::{WebhookApiError, WebhookAppState};
pub use routes::{cors_layer, webhook_router, webhook_routes, HttpLimits};
