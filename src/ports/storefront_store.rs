//! StorefrontStore port - Interface to the order ledger and product stock.
//!
//! Webhook providers deliver at least once, so every write through this port
//! must be safe to repeat:
//!
//! - Orders are unique per `(provider, payment_gateway, provider_order_id)`; a second
//!   insert reports `InsertOutcome::Conflict` instead of failing.
//! - Stock is only ever changed with a single conditional decrement that
//!   cannot go below zero, never with a separate read and write.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::order::Order;

/// Result of attempting to insert an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row was written (first delivery).
    Inserted,
    /// An order with the same gateway and provider order id already exists.
    Conflict,
}

/// Result of recording a completed sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleOutcome {
    /// Order written; `stock_decremented` is false when the product was out
    /// of stock, unknown, or not given.
    Recorded { stock_decremented: bool },
    /// Duplicate delivery; nothing changed.
    Duplicate,
}

/// Port for the durable order and product store.
#[async_trait]
pub trait StorefrontStore: Send + Sync {
    /// Insert a new order row.
    ///
    /// Uses `ON CONFLICT DO NOTHING` semantics on the deduplication key.
    async fn insert_order(&self, order: &Order) -> Result<InsertOutcome, DomainError>;

    /// Current stock for a product, `None` if the product does not exist.
    async fn product_stock(&self, product_id: &str) -> Result<Option<i32>, DomainError>;

    /// Decrement stock by one where it is positive.
    ///
    /// Returns `true` if a row changed.
    async fn decrement_stock_if_positive(&self, product_id: &str) -> Result<bool, DomainError>;

    /// Insert the order and, if it was new, take one unit of its product.
    ///
    /// The default composes the primitives above. Adapters that can should
    /// override it to run both writes in one transaction.
    async fn record_completed_sale(&self, order: &Order) -> Result<SaleOutcome, DomainError> {
        if self.insert_order(order).await? == InsertOutcome::Conflict {
            return Ok(SaleOutcome::Duplicate);
        }

        let stock_decremented = match order.product_id.as_deref() {
            Some(product_id) => self.decrement_stock_if_positive(product_id).await?,
            None => false,
        };

        Ok(SaleOutcome::Recorded { stock_decremented })
    }
}
