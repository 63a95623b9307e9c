//! Webhook handlers.
//!
//! ## Commands
//! - Processing a payment provider's webhook delivery
//!
//! ## Services
//! - Reconciling a normalized order event with the order ledger and stock

mod handle_provider_webhook;
mod reconcile_order;

pub use handle_provider_webhook::{
    HandleProviderWebhookCommand, HandleProviderWebhookHandler, HandleProviderWebhookResult,
};
pub use reconcile_order::{IgnoreReason, OrderReconciler, ReconciliationOutcome};
