//! OAuthClient port - the storefront platform's token endpoint.
//!
//! Two grant types are used: `authorization_code` during app install and
//! `refresh_token` for routine credential renewal.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::credential::TokenGrant;

/// Errors from the token endpoint.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The endpoint answered with a rejection (invalid grant, revoked
    /// refresh token, bad credentials).
    #[error("token endpoint rejected the request: {0}")]
    Rejected(String),

    /// The endpoint could not be reached or timed out.
    #[error("token endpoint unreachable: {0}")]
    Network(String),
}

/// Port for the OAuth token endpoint.
#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// Exchange an installation authorization code for a credential grant.
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, OAuthError>;

    /// Exchange a refresh token for a fresh credential grant.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, OAuthError>;
}
