//! Webhook ingestion domain.
//!
//! # Module Structure
//!
//! - `signature` - HMAC signing and constant-time verification
//! - `provider` - Static per-provider profiles (header, algorithm, field map)
//! - `normalizer` - Provider payload to `OrderEvent` mapping
//! - `order_event` - Provider-independent notification
//! - `webhook_errors` - Error taxonomy with status code mapping

mod normalizer;
mod order_event;
mod provider;
mod signature;
mod webhook_errors;

pub use normalizer::normalize;
pub use order_event::OrderEvent;
pub use provider::{FieldMap, ProviderProfile, ProviderTag, UnknownProvider};
pub use signature::{sign, verify, SignatureAlgorithm};
pub use webhook_errors::{NormalizationError, WebhookError};
