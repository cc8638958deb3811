//! Hosted-checkout preference creation.
//!
//! Builds the processor preference for a cart: visible line items, browser
//! return URLs, the webhook notification URL, and the order intent embedded
//! as metadata so the later payment notification can rebuild the storefront
//! order without any local state.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::payment::OrderIntent;
use crate::ports::{BackUrls, GatewayError, PaymentGateway, PreferenceItem, PreferenceRequest};

/// Public URLs the checkout flow hands to the processor.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Shopper-facing frontend, target of post-checkout redirects.
    pub front_url: String,

    /// This service's public base URL, target of payment notifications.
    pub back_url: String,
}

/// Currency attached to hosted-checkout line items.
#[derive(Debug, Clone)]
pub struct CheckoutCurrency(pub String);

/// A created checkout session, returned to the frontend.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub redirect_url: String,
    pub preference_id: String,
    pub external_reference: String,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart is unusable: no items or a non-positive total.
    #[error("checkout requires at least one item and a positive total")]
    InvalidIntent,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The processor created the preference but returned no checkout URL.
    #[error("payment gateway returned no redirect url")]
    MissingRedirect,
}

/// Creates hosted-checkout preferences on the payment processor.
pub struct CreateCheckoutHandler {
    gateway: Arc<dyn PaymentGateway>,
    urls: CheckoutUrls,
    currency: CheckoutCurrency,
}

impl CreateCheckoutHandler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        urls: CheckoutUrls,
        currency: CheckoutCurrency,
    ) -> Self {
        Self {
            gateway,
            urls,
            currency,
        }
    }

    /// Create a checkout session for the given intent.
    pub async fn create(&self, intent: OrderIntent) -> Result<CheckoutSession, CheckoutError> {
        if intent.items.is_empty() || intent.total <= 0.0 {
            return Err(CheckoutError::InvalidIntent);
        }

        let external_reference = format!("order_{}", Uuid::new_v4().simple());

        let items = intent
            .items
            .iter()
            .map(|item| PreferenceItem {
                title: if item.name.is_empty() {
                    "Storefront order".to_string()
                } else {
                    item.name.clone()
                },
                quantity: item.quantity,
                unit_price: item.price,
                currency_id: self.currency.0.clone(),
            })
            .collect();

        let request = PreferenceRequest {
            items,
            external_reference: external_reference.clone(),
            notification_url: format!("{}/webhooks/order-paid", self.urls.back_url),
            back_urls: BackUrls {
                success: format!("{}/checkout/success", self.urls.front_url),
                pending: format!("{}/checkout/pending", self.urls.front_url),
                failure: format!("{}/checkout/failure", self.urls.front_url),
            },
            metadata: intent,
        };

        let preference = self.gateway.create_preference(request).await?;
        let redirect_url = preference
            .redirect_url()
            .ok_or(CheckoutError::MissingRedirect)?
            .to_string();

        tracing::info!(
            preference_id = %preference.id,
            external_reference = %external_reference,
            "hosted-checkout preference created"
        );

        Ok(CheckoutSession {
            redirect_url,
            preference_id: preference.id,
            external_reference,
        })
    }
}
