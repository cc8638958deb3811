//! Payment notification parsing.
//!
//! The payment processor delivers the same logical event in several wire
//! shapes: the legacy IPN as query parameters (`?type=payment&id=123` or
//! `?data.id=123`), and the newer JSON webhook (`{"type": "payment",
//! "data": {"id": "123"}}` or `{"action": "payment.updated", ...}`).
//! All shapes collapse into one closed variant consumed by the reconciler;
//! anything that is not a payment notification with an id is terminal.

use std::collections::HashMap;

use serde_json::Value;

/// A normalized inbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A payment notification carrying the processor's payment id.
    Payment { id: String },

    /// Anything else: merchant-order topics, malformed payloads, payloads
    /// without an id. Acknowledged but never reconciled.
    Other,
}

impl NotificationEvent {
    /// Normalize a notification from query parameters and an optional JSON
    /// body. Either side may carry the topic and the id.
    pub fn from_wire(query: &HashMap<String, String>, body: Option<&Value>) -> Self {
        let topic = query
            .get("type")
            .or_else(|| query.get("topic"))
            .cloned()
            .or_else(|| body_string(body, "type"))
            .or_else(|| body_string(body, "action"));

        // An explicit non-payment topic is terminal regardless of what ids
        // happen to be present (merchant_order callbacks carry ids too).
        if let Some(topic) = &topic {
            if !is_payment_topic(topic) {
                return NotificationEvent::Other;
            }
        }

        let id = query
            .get("id")
            .or_else(|| query.get("data.id"))
            .cloned()
            .or_else(|| body.and_then(|b| b.get("data")).and_then(value_as_id))
            .or_else(|| body.and_then(value_as_id))
            .or_else(|| body_string(body, "payment_id"));

        match id {
            Some(id) if !id.is_empty() => NotificationEvent::Payment { id },
            _ => NotificationEvent::Other,
        }
    }
}

/// Topics that refer to a payment: the bare `payment` type of the query
/// form, and action strings like `payment.created` / `payment.updated`.
fn is_payment_topic(topic: &str) -> bool {
    topic == "payment" || topic.starts_with("payment.")
}

/// Extract an `id` field from a JSON object, tolerating both string and
/// numeric encodings (the processor uses both across API versions).
fn value_as_id(value: &Value) -> Option<String> {
    match value.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn body_string(body: Option<&Value>, key: &str) -> Option<String> {
    match body?.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
