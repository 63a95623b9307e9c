//! Order records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::status::OrderStatus;
use crate::domain::webhook::{OrderEvent, ProviderTag};

/// An order about to be written to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub provider: ProviderTag,
    pub order_number: String,
    pub product_id: Option<String>,
    pub customer_email: Option<String>,
    pub amount: f64,
    pub status: OrderStatus,
    pub provider_order_id: String,
    pub payment_gateway: String,
}

impl NewOrder {
    /// Builds the completed order recorded for a terminal success event.
    pub fn completed_from(event: &OrderEvent) -> Self {
        Self {
            provider: event.provider,
            order_number: event.external_order_id.clone(),
            product_id: event.product_id.clone(),
            customer_email: event.customer_email.clone(),
            amount: event.amount,
            status: OrderStatus::Completed,
            provider_order_id: event.provider_order_id.clone(),
            payment_gateway: event.gateway.clone(),
        }
    }

    /// Assigns an identifier and creation time.
    pub fn into_order(self, created_at: DateTime<Utc>) -> Order {
        Order {
            id: Uuid::new_v4(),
            provider: self.provider,
            order_number: self.order_number,
            product_id: self.product_id,
            customer_email: self.customer_email,
            amount: self.amount,
            status: self.status,
            provider_order_id: self.provider_order_id,
            payment_gateway: self.payment_gateway,
            created_at,
        }
    }
}

/// A persisted order. Never mutated by webhook ingestion once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: Uuid,
    /// Provider that delivered the order; scopes `provider_order_id`.
    pub provider: ProviderTag,
    pub order_number: String,
    pub product_id: Option<String>,
    pub customer_email: Option<String>,
    pub amount: f64,
    pub status: OrderStatus,
    pub provider_order_id: String,
    pub payment_gateway: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Uniqueness key of the ledger.
    pub fn dedup_key(&self) -> (ProviderTag, &str, &str) {
        (self.provider, &self.payment_gateway, &self.provider_order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paid_event() -> OrderEvent {
        OrderEvent {
            provider: ProviderTag::SellAuth,
            event_name: "order.paid".to_string(),
            external_order_id: "X1".to_string(),
            product_id: Some("P1".to_string()),
            customer_email: Some("a@b.com".to_string()),
            amount: 9.99,
            gateway: "sellauth".to_string(),
            provider_order_id: "981".to_string(),
            is_terminal_success: true,
        }
    }

    #[test]
    fn completed_order_copies_event_fields() {
        let order = NewOrder::completed_from(&paid_event());

        assert_eq!(order.order_number, "X1");
        assert_eq!(order.product_id.as_deref(), Some("P1"));
        assert_eq!(order.customer_email.as_deref(), Some("a@b.com"));
        assert_eq!(order.amount, 9.99);
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.provider_order_id, "981");
        assert_eq!(order.payment_gateway, "sellauth");
        assert_eq!(order.provider, ProviderTag::SellAuth);
    }

    #[test]
    fn into_order_keeps_fields_and_stamps_time() {
        let created_at = Utc::now();
        let order = NewOrder::completed_from(&paid_event()).into_order(created_at);

        assert_eq!(order.order_number, "X1");
        assert_eq!(order.created_at, created_at);
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.dedup_key(), (ProviderTag::SellAuth, "sellauth", "981"));
    }
}
