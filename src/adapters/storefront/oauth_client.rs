//! Storefront OAuth token-endpoint client.
//!
//! Implements the `OAuthClient` port: authorization-code exchange at app
//! install and refresh-token grants for routine renewal. Both are form
//! POSTs to the platform's token endpoint.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::credential::TokenGrant;
use crate::ports::{OAuthClient, OAuthError};

/// Token endpoint configuration.
#[derive(Clone)]
pub struct OAuthConfig {
    /// Token endpoint URL, e.g. `https://www.nuvemshop.com.br/apps/token`.
    pub token_url: String,

    pub client_id: String,
    pub client_secret: SecretString,

    /// Redirect URI registered for the authorization-code flow.
    pub redirect_uri: Option<String>,

    /// App identification required by the platform.
    pub user_agent: String,

    /// Bound on every outbound call.
    pub timeout: Duration,
}

/// reqwest-backed `OAuthClient`.
pub struct StorefrontOAuthClient {
    config: OAuthConfig,
    http_client: reqwest::Client,
}

impl StorefrontOAuthClient {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn request_grant(&self, params: &[(&str, &str)]) -> Result<TokenGrant, OAuthError> {
        let response = self
            .http_client
            .post(&self.config.token_url)
            .timeout(self.config.timeout)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .form(params)
            .send()
            .await
            .map_err(|err| OAuthError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthError::Rejected(format!("{}: {}", status, body)));
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|err| OAuthError::Rejected(format!("unparseable token response: {}", err)))
    }
}

#[async_trait]
impl OAuthClient for StorefrontOAuthClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, OAuthError> {
        let client_secret = self.config.client_secret.expose_secret().clone();
        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
        ];
        if let Some(redirect_uri) = &self.config.redirect_uri {
            params.push(("redirect_uri", redirect_uri.as_str()));
        }

        self.request_grant(&params).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, OAuthError> {
        let client_secret = self.config.client_secret.expose_secret().clone();
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        self.request_grant(&params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_grant_parses_full_endpoint_response() {
        let grant: TokenGrant = serde_json::from_str(
            r#"{
                "access_token": "at-1",
                "token_type": "bearer",
                "scope": "read_products,write_orders",
                "refresh_token": "rt-1",
                "expires_in": 86400
            }"#,
        )
        .unwrap();

        assert_eq!(grant.access_token, "at-1");
        assert_eq!(grant.refresh_token, Some("rt-1".to_string()));
        assert_eq!(grant.expires_in, Some(86400));
    }

    #[test]
    fn token_grant_parses_legacy_response_without_expiry() {
        let grant: TokenGrant = serde_json::from_str(
            r#"{"access_token": "at-1", "token_type": "bearer"}"#,
        )
        .unwrap();

        assert!(grant.refresh_token.is_none());
        assert!(grant.expires_in.is_none());
    }
}
