//! Mercado Pago payment-processor adapter.
//!
//! Implements the `PaymentGateway` port: idempotent payment lookups by id
//! (the authoritative state behind every webhook decision) and hosted
//! Checkout Pro preference creation.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::payment::{OrderIntent, PaymentRecord, PaymentStatus};
use crate::ports::{
    BackUrls, CheckoutPreference, GatewayError, PaymentGateway, PreferenceItem, PreferenceRequest,
};

/// Mercado Pago API configuration.
#[derive(Clone)]
pub struct MercadoPagoConfig {
    /// API access token (`APP_USR-...` or `TEST-...`).
    pub access_token: SecretString,

    /// API root (default `https://api.mercadopago.com`).
    pub api_base_url: String,

    /// Bound on every outbound call.
    pub timeout: Duration,
}

impl MercadoPagoConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            api_base_url: "https://api.mercadopago.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// reqwest-backed `PaymentGateway`.
pub struct MercadoPagoClient {
    config: MercadoPagoConfig,
    http_client: reqwest::Client,
}

impl MercadoPagoClient {
    pub fn new(config: MercadoPagoConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

/// Payment lookup response; the slice of fields we consume.
#[derive(Debug, Deserialize)]
struct PaymentResponse {
    id: i64,
    status: String,

    #[serde(default)]
    external_reference: Option<String>,

    #[serde(default)]
    metadata: Option<serde_json::Value>,

    #[serde(default)]
    transaction_amount: Option<f64>,

    #[serde(default)]
    currency_id: Option<String>,
}

impl PaymentResponse {
    fn into_record(self) -> PaymentRecord {
        let metadata = self.metadata.and_then(|value| {
            if value.is_null() {
                return None;
            }
            match serde_json::from_value::<OrderIntent>(value) {
                Ok(intent) => Some(intent),
                Err(err) => {
                    tracing::warn!(
                        payment_id = self.id,
                        error = %err,
                        "payment metadata present but not a usable order intent"
                    );
                    None
                }
            }
        });

        PaymentRecord {
            id: self.id.to_string(),
            status: PaymentStatus::parse(&self.status),
            external_reference: self.external_reference,
            metadata,
            transaction_amount: self.transaction_amount,
            currency_id: self.currency_id,
        }
    }
}

/// Preference creation body; the port request plus processor-fixed fields.
#[derive(Debug, Serialize)]
struct PreferenceBody<'a> {
    items: &'a [PreferenceItem],
    external_reference: &'a str,
    notification_url: &'a str,
    back_urls: &'a BackUrls,
    auto_return: &'static str,
    metadata: &'a OrderIntent,
}

#[derive(Debug, Deserialize)]
struct PreferenceResponse {
    id: String,

    #[serde(default)]
    init_point: Option<String>,

    #[serde(default)]
    sandbox_init_point: Option<String>,
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
    async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentRecord, GatewayError> {
        let url = format!("{}/v1/payments/{}", self.config.api_base_url, payment_id);

        let response = self
            .http_client
            .get(&url)
            .timeout(self.config.timeout)
            .bearer_auth(self.config.access_token.expose_secret())
            .send()
            .await
            .map_err(|err| GatewayError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected(format!("{}: {}", status, body)));
        }

        let payment: PaymentResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::Malformed(err.to_string()))?;

        Ok(payment.into_record())
    }

    async fn create_preference(
        &self,
        request: PreferenceRequest,
    ) -> Result<CheckoutPreference, GatewayError> {
        let url = format!("{}/checkout/preferences", self.config.api_base_url);

        let body = PreferenceBody {
            items: &request.items,
            external_reference: &request.external_reference,
            notification_url: &request.notification_url,
            back_urls: &request.back_urls,
            auto_return: "approved",
            metadata: &request.metadata,
        };

        let response = self
            .http_client
            .post(&url)
            .timeout(self.config.timeout)
            .bearer_auth(self.config.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| GatewayError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected(format!("{}: {}", status, body)));
        }

        let preference: PreferenceResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::Malformed(err.to_string()))?;

        Ok(CheckoutPreference {
            id: preference.id,
            init_point: preference.init_point,
            sandbox_init_point: preference.sandbox_init_point,
        })
    }
}
