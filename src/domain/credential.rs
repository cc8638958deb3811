//! Access credential record and lifecycle types.
//!
//! The storefront platform issues OAuth-style credentials: an access token,
//! an optional refresh token, and an expiry horizon. The record is owned by
//! the credential lifecycle manager and persisted through the `TokenStore`
//! port; nothing else mutates it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted access credential for the storefront API.
///
/// `expires_at` is absent for tokens the platform issued without an expiry
/// (legacy long-lived tokens); such records are never considered stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Bearer token presented on every storefront API call.
    pub access_token: String,

    /// Refresh token for the OAuth token endpoint, when the platform
    /// granted one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Instant after which the access token must be refreshed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    /// Build a record from a token-endpoint grant received at `now`.
    pub fn from_grant(grant: TokenGrant, now: DateTime<Utc>) -> Self {
        Self {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_at: grant.expires_in.map(|secs| now + Duration::seconds(secs)),
        }
    }

    /// A record is stale once its expiry horizon has passed.
    ///
    /// Staleness is evaluated lazily at each call site; there is no
    /// background timer watching the clock.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now)
    }
}

/// Successful response from the OAuth token endpoint.
///
/// Produced by both the authorization-code exchange and the refresh grant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,

    /// The endpoint may rotate the refresh token on every grant.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Errors surfaced by `get_valid_token`.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No stored credential and no fallback token configured. Fatal for any
    /// outbound storefront call attempted this cycle.
    #[error("no access credential available; seed the token store or configure a fallback token")]
    AuthUnavailable,

    /// The token endpoint rejected or timed out on the refresh. Recoverable:
    /// the stored record is left unchanged and the next call retries.
    #[error("credential refresh failed: {0}")]
    RefreshFailed(String),
}
