//! Storefront platform configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Storefront platform configuration (API, OAuth app, forwarding policy)
#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontConfig {
    /// Store the app is installed on
    pub store_id: String,

    /// App identification sent as User-Agent on every platform call
    pub user_agent: String,

    /// OAuth app client id
    pub client_id: String,

    /// OAuth app client secret; also the HMAC key for compliance webhooks
    pub client_secret: String,

    /// Platform API root
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// OAuth token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Redirect URI registered for the authorization-code flow
    pub redirect_uri: Option<String>,

    /// Static access token used when the token store holds nothing
    pub fallback_access_token: Option<String>,

    /// Path of the persisted credential record
    #[serde(default = "default_token_file")]
    pub token_file: String,

    /// Province/state code applied when checkout data omits one
    #[serde(default = "default_province")]
    pub default_province: String,

    /// Country code stamped on order addresses
    #[serde(default = "default_country")]
    pub country: String,

    /// Carrier name stamped on forwarded orders
    #[serde(default = "default_shipping_carrier")]
    pub shipping_carrier: String,

    /// Shipping option stamped on forwarded orders
    #[serde(default = "default_shipping_option")]
    pub shipping_option: String,

    /// Shipping cost charged to the customer
    #[serde(default = "default_shipping_cost")]
    pub shipping_cost: f64,

    /// Timeout for platform API and token endpoint calls, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl StorefrontConfig {
    /// Validate storefront configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.store_id.is_empty() {
            return Err(ValidationError::MissingRequired("STOREFRONT__STORE_ID"));
        }
        if self.user_agent.is_empty() {
            return Err(ValidationError::MissingRequired("STOREFRONT__USER_AGENT"));
        }
        if self.client_id.is_empty() {
            return Err(ValidationError::MissingRequired("STOREFRONT__CLIENT_ID"));
        }
        if self.client_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STOREFRONT__CLIENT_SECRET"));
        }
        if !self.api_base_url.starts_with("http") {
            return Err(ValidationError::InvalidUrl("storefront api_base_url"));
        }
        if !self.token_url.starts_with("http") {
            return Err(ValidationError::InvalidUrl("storefront token_url"));
        }
        if self.shipping_cost < 0.0 {
            return Err(ValidationError::InvalidShippingCost);
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.nuvemshop.com.br/v1".to_string()
}

fn default_token_url() -> String {
    "https://www.nuvemshop.com.br/apps/token".to_string()
}

fn default_token_file() -> String {
    "tokens.json".to_string()
}

fn default_province() -> String {
    "SP".to_string()
}

fn default_country() -> String {
    "BR".to_string()
}

fn default_shipping_carrier() -> String {
    "Correios".to_string()
}

fn default_shipping_option() -> String {
    "PAC".to_string()
}

fn default_shipping_cost() -> f64 {
    10.0
}

fn default_timeout() -> u64 {
    10
}
