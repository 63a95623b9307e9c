//! OrderReconciler - Turns a normalized order event into at most one order.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::order::NewOrder;
use crate::domain::webhook::{OrderEvent, WebhookError};
use crate::ports::{SaleOutcome, StorefrontStore};

/// Why an event produced no order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Event is not one of the provider's success events.
    NotTerminal { event_name: String },
    /// An order with the same gateway and provider order id already exists.
    Duplicate,
}

/// Outcome of reconciling one event.
#[derive(Debug)]
pub enum ReconciliationOutcome {
    /// Order written; stock decremented if the product had any left.
    Created {
        order_id: Uuid,
        order_number: String,
        stock_decremented: bool,
    },
    /// Nothing written.
    Ignored(IgnoreReason),
    /// Storage failed; the provider should redeliver.
    Failed(WebhookError),
}

impl ReconciliationOutcome {
    /// Short machine-readable failure reason, `None` unless `Failed`.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            ReconciliationOutcome::Failed(WebhookError::StorageTimeout) => Some("storage_timeout"),
            ReconciliationOutcome::Failed(WebhookError::StoreUnavailable) => {
                Some("store_unavailable")
            }
            ReconciliationOutcome::Failed(_) => Some("order_insert_error"),
            _ => None,
        }
    }
}

/// Records completed sales against the storefront store.
///
/// Cheap to clone; clones share the store.
#[derive(Clone)]
pub struct OrderReconciler {
    store: Arc<dyn StorefrontStore>,
    storage_timeout: Duration,
}

impl OrderReconciler {
    pub fn new(store: Arc<dyn StorefrontStore>, storage_timeout: Duration) -> Self {
        Self {
            store,
            storage_timeout,
        }
    }

    pub async fn reconcile(&self, event: OrderEvent) -> ReconciliationOutcome {
        if !event.is_terminal_success {
            debug!(
                provider = %event.provider,
                event_name = %event.event_name,
                "Ignoring non-terminal webhook event"
            );
            return ReconciliationOutcome::Ignored(IgnoreReason::NotTerminal {
                event_name: event.event_name,
            });
        }

        let order = NewOrder::completed_from(&event).into_order(Utc::now());

        let sale = tokio::time::timeout(
            self.storage_timeout,
            self.store.record_completed_sale(&order),
        )
        .await;

        let outcome = match sale {
            Err(_) => ReconciliationOutcome::Failed(WebhookError::StorageTimeout),
            Ok(Err(err)) => ReconciliationOutcome::Failed(err.into()),
            Ok(Ok(SaleOutcome::Duplicate)) => {
                let (provider, gateway, provider_order_id) = event.dedup_key();
                info!(
                    provider = %provider,
                    order_number = %order.order_number,
                    gateway,
                    provider_order_id,
                    "Duplicate delivery, order already recorded"
                );
                ReconciliationOutcome::Ignored(IgnoreReason::Duplicate)
            }
            Ok(Ok(SaleOutcome::Recorded { stock_decremented })) => {
                info!(
                    provider = %event.provider,
                    order_number = %order.order_number,
                    order_id = %order.id,
                    stock_decremented,
                    "Order created"
                );
                if !stock_decremented {
                    if let Some(product_id) = order.product_id.as_deref() {
                        self.report_unfulfilled_stock(product_id).await;
                    }
                }
                ReconciliationOutcome::Created {
                    order_id: order.id,
                    order_number: order.order_number,
                    stock_decremented,
                }
            }
        };

        if let ReconciliationOutcome::Failed(err) = &outcome {
            error!(
                provider = %event.provider,
                order_number = %event.external_order_id,
                reason = outcome.reason().unwrap_or_default(),
                error = %err,
                "Order reconciliation failed"
            );
        }

        outcome
    }

    /// Logs why a sale took no stock. Failures here never affect the outcome.
    async fn report_unfulfilled_stock(&self, product_id: &str) {
        let stock =
            tokio::time::timeout(self.storage_timeout, self.store.product_stock(product_id)).await;

        match stock {
            Ok(Ok(Some(_))) => warn!(product_id, "Product out of stock, order recorded anyway"),
            Ok(Ok(None)) => warn!(product_id, "Order references unknown product"),
            Ok(Err(err)) => debug!(product_id, error = %err, "Could not read product stock"),
            Err(_) => debug!(product_id, "Timed out reading product stock"),
        }
    }
}
