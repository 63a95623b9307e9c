//! Payload normalization.
//!
//! Maps a provider's event envelope onto [`OrderEvent`] using the field table
//! in its [`ProviderProfile`]. Candidate field names are tried in order and
//! the first present, non-null, non-empty value wins.

use serde_json::{Map, Value};

use super::order_event::OrderEvent;
use super::provider::ProviderProfile;
use super::webhook_errors::NormalizationError;

/// Largest amount the order ledger can hold (`NUMERIC(12, 2)`).
pub const MAX_ORDER_AMOUNT: f64 = 9_999_999_999.99;

/// Normalizes a raw JSON payload for the given provider.
///
/// # Errors
///
/// - `MalformedPayload` - body is not a JSON object
/// - `InvalidAmount` - a success event carries a non-numeric, negative or
///   out-of-range amount
/// - `MissingField` - a success event has no order data or order id
///
/// Unknown event names are not errors; they yield `is_terminal_success = false`.
pub fn normalize(
    profile: &ProviderProfile,
    raw_json: &[u8],
) -> Result<OrderEvent, NormalizationError> {
    let envelope: Value = serde_json::from_slice(raw_json)
        .map_err(|e| NormalizationError::MalformedPayload(e.to_string()))?;
    let envelope = envelope
        .as_object()
        .ok_or_else(|| NormalizationError::MalformedPayload("expected a JSON object".into()))?;

    let event_name = envelope
        .get(profile.event_field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let is_terminal_success = profile.is_success_event(&event_name);

    let empty = Map::new();
    let data = match envelope.get(profile.data_field).and_then(Value::as_object) {
        Some(data) => data,
        None if is_terminal_success => {
            return Err(NormalizationError::MissingField(profile.data_field))
        }
        None => &empty,
    };

    let fields = &profile.fields;
    let amount = match parse_amount(data, fields.amount) {
        Ok(amount) => amount,
        Err(e) if is_terminal_success => return Err(e),
        Err(_) => 0.0,
    };

    let external_order_id = first_text(data, fields.external_order_id).unwrap_or_default();
    if is_terminal_success && external_order_id.is_empty() {
        return Err(NormalizationError::MissingField("order id"));
    }

    let provider_order_id = first_text(data, fields.provider_order_id)
        .unwrap_or_else(|| external_order_id.clone());
    let gateway = first_text(data, fields.gateway)
        .unwrap_or_else(|| profile.default_gateway.to_string());

    Ok(OrderEvent {
        provider: profile.tag,
        event_name,
        external_order_id,
        product_id: first_text(data, fields.product_id),
        customer_email: first_text(data, fields.customer_email),
        amount,
        gateway,
        provider_order_id,
        is_terminal_success,
    })
}

/// Returns the first candidate that is a non-empty string or a number.
fn first_text(data: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|name| match data.get(*name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Parses the first present amount candidate; absent means zero.
fn parse_amount(data: &Map<String, Value>, candidates: &[&str]) -> Result<f64, NormalizationError> {
    let value = candidates.iter().find_map(|name| match data.get(*name) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(value),
    });

    let amount = match value {
        None => return Ok(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match amount {
        Some(amount) if amount.is_finite() && (0.0..=MAX_ORDER_AMOUNT).contains(&amount) => Ok(amount),
        _ => Err(NormalizationError::InvalidAmount(
            value.map(Value::to_string).unwrap_or_default(),
        )),
    }
}
