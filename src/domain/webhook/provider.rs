//! Payment provider profiles.
//!
//! Each supported provider is described by a static [`ProviderProfile`]: the
//! header carrying its signature, the MAC algorithm, its vocabulary of
//! terminal-success events, and where its payload keeps each order field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::signature::SignatureAlgorithm;

/// Identifies a payment provider. Used as the path segment of its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTag {
    SellAuth,
    Sellix,
}

impl ProviderTag {
    /// All supported providers.
    pub const ALL: [ProviderTag; 2] = [ProviderTag::SellAuth, ProviderTag::Sellix];

    /// Returns the lowercase tag used in URLs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTag::SellAuth => "sellauth",
            ProviderTag::Sellix => "sellix",
        }
    }

    /// Returns the static profile for this provider.
    pub fn profile(&self) -> &'static ProviderProfile {
        match self {
            ProviderTag::SellAuth => &SELLAUTH,
            ProviderTag::Sellix => &SELLIX,
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderTag {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sellauth" => Ok(ProviderTag::SellAuth),
            "sellix" => Ok(ProviderTag::Sellix),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// Returned when a provider tag is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown payment provider: {0}")]
pub struct UnknownProvider(pub String);

/// Candidate JSON field names, tried in order, for each order attribute.
#[derive(Debug)]
pub struct FieldMap {
    pub external_order_id: &'static [&'static str],
    pub provider_order_id: &'static [&'static str],
    pub product_id: &'static [&'static str],
    pub customer_email: &'static [&'static str],
    pub amount: &'static [&'static str],
    pub gateway: &'static [&'static str],
}

/// Declarative description of one provider's webhook contract.
#[derive(Debug)]
pub struct ProviderProfile {
    pub tag: ProviderTag,
    /// Header carrying the hex signature.
    pub signature_header: &'static str,
    pub algorithm: SignatureAlgorithm,
    /// Top-level field holding the event name.
    pub event_field: &'static str,
    /// Top-level field holding the order object.
    pub data_field: &'static str,
    /// Event names meaning the payment fully completed.
    pub success_events: &'static [&'static str],
    pub fields: FieldMap,
    /// Gateway recorded when the payload names none.
    pub default_gateway: &'static str,
}

impl ProviderProfile {
    /// Returns true if `event_name` is one of this provider's success events.
    pub fn is_success_event(&self, event_name: &str) -> bool {
        self.success_events.contains(&event_name)
    }
}

static SELLAUTH: ProviderProfile = ProviderProfile {
    tag: ProviderTag::SellAuth,
    signature_header: "X-Webhook-Signature",
    algorithm: SignatureAlgorithm::HmacSha256,
    event_field: "event",
    data_field: "data",
    success_events: &["order.completed", "order.paid"],
    fields: FieldMap {
        external_order_id: &["order_id", "id"],
        provider_order_id: &["id", "order_id"],
        product_id: &["product_id"],
        customer_email: &["customer_email", "email"],
        amount: &["total", "amount"],
        gateway: &["payment_method"],
    },
    default_gateway: "sellauth",
};

static SELLIX: ProviderProfile = ProviderProfile {
    tag: ProviderTag::Sellix,
    signature_header: "X-Sellix-Signature",
    algorithm: SignatureAlgorithm::HmacSha512,
    event_field: "event",
    data_field: "data",
    success_events: &["order:paid", "order:completed"],
    fields: FieldMap {
        external_order_id: &["uniqid"],
        provider_order_id: &["id"],
        product_id: &["product_id"],
        customer_email: &["customer_email"],
        amount: &["total"],
        gateway: &["gateway"],
    },
    default_gateway: "sellix",
};
