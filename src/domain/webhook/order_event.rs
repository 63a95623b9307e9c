//! Provider-independent view of one webhook notification.

use super::provider::ProviderTag;

/// A payment notification normalized from any provider's payload.
///
/// Lives for a single request. `amount` is always finite and non-negative,
/// and `external_order_id` is non-empty whenever `is_terminal_success` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEvent {
    pub provider: ProviderTag,
    /// Raw event discriminator as sent by the provider.
    pub event_name: String,
    /// Storefront-facing order number.
    pub external_order_id: String,
    pub product_id: Option<String>,
    pub customer_email: Option<String>,
    pub amount: f64,
    /// Payment gateway reported by the provider, or the provider's default.
    pub gateway: String,
    /// Provider-side identifier, unique within one provider and gateway.
    pub provider_order_id: String,
    pub is_terminal_success: bool,
}

impl OrderEvent {
    /// Key under which duplicate deliveries of the same order collapse.
    pub fn dedup_key(&self) -> (ProviderTag, &str, &str) {
        (self.provider, &self.gateway, &self.provider_order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_key_scopes_provider_order_id_by_provider_and_gateway() {
        let event = OrderEvent {
            provider: ProviderTag::Sellix,
            event_name: "order:paid".to_string(),
            external_order_id: "abc123".to_string(),
            product_id: None,
            customer_email: None,
            amount: 0.0,
            gateway: "STRIPE".to_string(),
            provider_order_id: "42".to_string(),
            is_terminal_success: true,
        };

        assert_eq!(event.dedup_key(), (ProviderTag::Sellix, "STRIPE", "42"));

        let sellauth = OrderEvent {
            provider: ProviderTag::SellAuth,
            ..event.clone()
        };
        assert_ne!(sellauth.dedup_key(), event.dedup_key());
    }
}
