//! Store used when no storage credential is configured.
//!
//! The process still starts and answers webhooks, but every storage
//! operation fails so terminal events get a 5xx and the provider retries
//! once the credential is fixed.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::order::Order;
use crate::ports::{InsertOutcome, StorefrontStore};

/// Storefront store that rejects every operation.
#[derive(Debug, Clone, Default)]
pub struct FailClosedStore {
    reason: String,
}

impl FailClosedStore {
    /// Creates a store that reports `reason` on every call.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable(&self) -> DomainError {
        DomainError::new(ErrorCode::StoreUnavailable, self.reason.clone())
    }
}

#[async_trait]
impl StorefrontStore for FailClosedStore {
    async fn insert_order(&self, _order: &Order) -> Result<InsertOutcome, DomainError> {
        Err(self.unavailable())
    }

    async fn product_stock(&self, _product_id: &str) -> Result<Option<i32>, DomainError> {
        Err(self.unavailable())
    }

    async fn decrement_stock_if_positive(&self, _product_id: &str) -> Result<bool, DomainError> {
        Err(self.unavailable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{NewOrder, OrderStatus};
    use crate::domain::webhook::ProviderTag;
    use chrono::Utc;

    #[tokio::test]
    async fn every_operation_reports_store_unavailable() {
        let store = FailClosedStore::new("storage credential not configured");
        let order = NewOrder {
            provider: ProviderTag::SellAuth,
            order_number: "X1".to_string(),
            product_id: Some("P1".to_string()),
            customer_email: None,
            amount: 1.0,
            status: OrderStatus::Completed,
            provider_order_id: "1".to_string(),
            payment_gateway: "sellauth".to_string(),
        }
        .into_order(Utc::now());

        let err = store.record_completed_sale(&order).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreUnavailable);
        assert_eq!(err.message, "storage credential not configured");

        assert!(store.product_stock("P1").await.is_err());
        assert!(store.decrement_stock_if_positive("P1").await.is_err());
    }
}
