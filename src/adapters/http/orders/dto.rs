//! Checkout request/response DTOs.

use serde::{Deserialize, Serialize};

use crate::application::CheckoutSession;
use crate::domain::payment::{IntentCustomer, IntentItem, OrderIntent};

/// Frontend request to open a hosted checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCheckoutRequest {
    #[serde(default)]
    pub items: Vec<IntentItem>,

    #[serde(default)]
    pub customer: IntentCustomer,

    #[serde(default)]
    pub total: f64,
}

impl CreateCheckoutRequest {
    pub fn into_intent(self) -> OrderIntent {
        OrderIntent {
            items: self.items,
            customer: self.customer,
            total: self.total,
        }
    }
}

/// Response handed back to the frontend for the redirect.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub redirect_url: String,
    pub preference_id: String,
    pub external_reference: String,
}

impl From<CheckoutSession> for CheckoutResponse {
    fn from(session: CheckoutSession) -> Self {
        Self {
            redirect_url: session.redirect_url,
            preference_id: session.preference_id,
            external_reference: session.external_reference,
        }
    }
}

/// Error body for checkout failures.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parses_frontend_shape() {
        let request: CreateCheckoutRequest = serde_json::from_str(
            r#"{
                "items": [{"variant_id": 7, "quantity": 2, "price": 10.0, "name": "Red"}],
                "customer": {"name": "Ana", "email": "ana@example.com", "state": "MG"},
                "total": 20.0
            }"#,
        )
        .unwrap();

        let intent = request.into_intent();

        assert_eq!(intent.items.len(), 1);
        assert_eq!(intent.customer.state, Some("MG".to_string()));
        assert_eq!(intent.total, 20.0);
    }

    #[test]
    fn request_tolerates_missing_sections() {
        let request: CreateCheckoutRequest = serde_json::from_str("{}").unwrap();

        let intent = request.into_intent();

        assert!(intent.items.is_empty());
        assert_eq!(intent.total, 0.0);
    }
}
