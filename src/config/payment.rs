//! Payment processor configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment processor configuration (Mercado Pago)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Processor API access token
    pub access_token: String,

    /// Processor API root
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Currency attached to hosted-checkout line items
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Shopper-facing frontend base URL (post-checkout redirects)
    pub front_url: String,

    /// This service's public base URL (webhook notifications)
    pub back_url: String,

    /// Timeout for processor API calls, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl PaymentConfig {
    /// Check if using a sandbox access token
    pub fn is_test_mode(&self) -> bool {
        self.access_token.starts_with("TEST-")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.access_token.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__ACCESS_TOKEN"));
        }
        if !self.front_url.starts_with("http") {
            return Err(ValidationError::InvalidUrl("payment front_url"));
        }
        if !self.back_url.starts_with("http") {
            return Err(ValidationError::InvalidUrl("payment back_url"));
        }
        if !self.api_base_url.starts_with("http") {
            return Err(ValidationError::InvalidUrl("payment api_base_url"));
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.mercadopago.com".to_string()
}

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_timeout() -> u64 {
    10
}
