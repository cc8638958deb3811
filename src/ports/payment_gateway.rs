//! PaymentGateway port - the payment processor's API.
//!
//! Two operations are load-bearing for this service: fetching the
//! authoritative payment state by id (idempotent GET, safe to repeat on
//! duplicate notifications) and creating hosted-checkout preferences that
//! carry the order intent as metadata.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::payment::{OrderIntent, PaymentRecord};

/// Errors from the payment processor.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The processor answered with an error status.
    #[error("payment gateway rejected the request: {0}")]
    Rejected(String),

    /// The processor could not be reached or timed out.
    #[error("payment gateway unreachable: {0}")]
    Network(String),

    /// The processor's response could not be decoded.
    #[error("payment gateway response malformed: {0}")]
    Malformed(String),
}

/// Request to create a hosted-checkout preference.
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,

    /// Our own order reference; echoed back on the payment record.
    pub external_reference: String,

    /// Webhook URL the processor notifies on payment events.
    pub notification_url: String,

    pub back_urls: BackUrls,

    /// Order intent round-tripped through the processor so the webhook can
    /// rebuild the storefront order without local state.
    pub metadata: OrderIntent,
}

/// One line item shown on the hosted checkout page.
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceItem {
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub currency_id: String,
}

/// Browser redirect targets after checkout.
#[derive(Debug, Clone, Serialize)]
pub struct BackUrls {
    pub success: String,
    pub pending: String,
    pub failure: String,
}

/// A created hosted-checkout preference.
#[derive(Debug, Clone)]
pub struct CheckoutPreference {
    pub id: String,

    /// Production checkout URL.
    pub init_point: Option<String>,

    /// Sandbox checkout URL, present in test mode.
    pub sandbox_init_point: Option<String>,
}

impl CheckoutPreference {
    /// The URL to redirect the shopper to, preferring production.
    pub fn redirect_url(&self) -> Option<&str> {
        self.init_point
            .as_deref()
            .or(self.sandbox_init_point.as_deref())
    }
}

/// Port for the payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fetch the authoritative payment record by processor payment id.
    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentRecord, GatewayError>;

    /// Create a hosted-checkout preference.
    async fn create_preference(
        &self,
        request: PreferenceRequest,
    ) -> Result<CheckoutPreference, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn redirect_url_prefers_production() {
        let preference = CheckoutPreference {
            id: "pref_1".to_string(),
            init_point: Some("https://checkout.example/live".to_string()),
            sandbox_init_point: Some("https://checkout.example/sandbox".to_string()),
        };

        assert_eq!(
            preference.redirect_url(),
            Some("https://checkout.example/live")
        );
    }

    #[test]
    fn redirect_url_falls_back_to_sandbox() {
        let preference = CheckoutPreference {
            id: "pref_1".to_string(),
            init_point: None,
            sandbox_init_point: Some("https://checkout.example/sandbox".to_string()),
        };

        assert_eq!(
            preference.redirect_url(),
            Some("https://checkout.example/sandbox")
        );
    }

    #[test]
    fn redirect_url_absent_when_processor_returned_none() {
        let preference = CheckoutPreference {
            id: "pref_1".to_string(),
            init_point: None,
            sandbox_init_point: None,
        };

        assert!(preference.redirect_url().is_none());
    }
}
