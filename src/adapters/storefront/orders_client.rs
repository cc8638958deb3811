//! Storefront orders API client.
//!
//! Implements the `OrderSink` port against the storefront platform's REST
//! API. The platform authenticates with a nonstandard `Authentication:
//! bearer <token>` header and requires an identifying `User-Agent` on every
//! call.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::order::OrderPayload;
use crate::ports::{CreatedOrder, OrderError, OrderSink};

/// Storefront API configuration.
#[derive(Debug, Clone)]
pub struct StorefrontApiConfig {
    /// API root, e.g. `https://api.nuvemshop.com.br/v1`.
    pub api_base_url: String,

    /// Store the app is installed on; part of every API path.
    pub store_id: String,

    /// App identification required by the platform.
    pub user_agent: String,

    /// Bound on every outbound call.
    pub timeout: Duration,
}

impl StorefrontApiConfig {
    fn orders_url(&self) -> String {
        format!(
            "{}/{}/orders",
            self.api_base_url.trim_end_matches('/'),
            self.store_id
        )
    }
}

/// reqwest-backed `OrderSink`.
pub struct StorefrontOrdersClient {
    config: StorefrontApiConfig,
    http_client: reqwest::Client,
}

impl StorefrontOrdersClient {
    pub fn new(config: StorefrontApiConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

/// Order-creation response; only the id is consumed.
#[derive(Debug, Deserialize)]
struct OrderCreatedResponse {
    id: u64,
}

#[async_trait]
impl OrderSink for StorefrontOrdersClient {
    async fn create_order(
        &self,
        payload: &OrderPayload,
        access_token: &str,
    ) -> Result<CreatedOrder, OrderError> {
        let response = self
            .http_client
            .post(self.config.orders_url())
            .timeout(self.config.timeout)
            .header("Authentication", format!("bearer {}", access_token))
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .json(payload)
            .send()
            .await
            .map_err(|err| OrderError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "storefront order creation failed");
            return Err(OrderError::Rejected(format!("{}: {}", status, body)));
        }

        let created: OrderCreatedResponse = response
            .json()
            .await
            .map_err(|err| OrderError::Rejected(format!("unparseable order response: {}", err)))?;

        Ok(CreatedOrder { id: created.id })
    }
}
