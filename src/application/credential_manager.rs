//! Credential lifecycle manager - serves a continuously valid access token.
//!
//! Wraps the `TokenStore` and decides, lazily at each call, whether the
//! stored credential is still usable. Staleness triggers a single-flight
//! refresh against the OAuth token endpoint: when N concurrent callers
//! observe a stale credential, exactly one network refresh is issued and
//! the rest reuse its persisted result.
//!
//! ## State machine
//!
//! `VALID -> STALE` (time-triggered, discovered on demand; no background
//! timer) `-> REFRESHING -> VALID` on success, back to `STALE` on failure
//! so the next call retries.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use crate::domain::credential::{CredentialError, CredentialRecord, TokenGrant};
use crate::ports::{Clock, OAuthClient, TokenStore, TokenStoreError};

/// Owner of the stored credential record.
///
/// All reads and writes of the record go through this manager; the auth
/// callback seeds it via [`store_grant`](Self::store_grant) and everything
/// else calls [`get_valid_token`](Self::get_valid_token).
pub struct CredentialLifecycleManager {
    store: Arc<dyn TokenStore>,
    oauth: Arc<dyn OAuthClient>,
    clock: Arc<dyn Clock>,

    /// Static token used when the store holds nothing, for installs that
    /// predate the OAuth flow.
    fallback_token: Option<SecretString>,

    /// Serializes the refresh-and-persist critical section. Held only on
    /// the stale path; valid-token reads never contend on it.
    refresh_gate: Mutex<()>,
}

impl CredentialLifecycleManager {
    pub fn new(
        store: Arc<dyn TokenStore>,
        oauth: Arc<dyn OAuthClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            oauth,
            clock,
            fallback_token: None,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Configure a static fallback token used when no record is stored.
    pub fn with_fallback_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !token.is_empty() {
            self.fallback_token = Some(SecretString::new(token));
        }
        self
    }

    /// Return an access token that is valid to the best of our knowledge.
    ///
    /// # Errors
    ///
    /// - [`CredentialError::AuthUnavailable`] when no record is stored and
    ///   no fallback token is configured.
    /// - [`CredentialError::RefreshFailed`] when the stored record is stale
    ///   and the token endpoint rejected or timed out on the refresh. The
    ///   stored record is left unchanged; the next call retries.
    pub async fn get_valid_token(&self) -> Result<String, CredentialError> {
        match self.load_record().await {
            Some(record) if !record.is_stale(self.clock.now()) => Ok(record.access_token),
            Some(_) => self.refresh_stale().await,
            None => self.fallback(),
        }
    }

    /// Persist a grant obtained out-of-band (the install-time
    /// authorization-code exchange).
    pub async fn store_grant(
        &self,
        grant: TokenGrant,
    ) -> Result<CredentialRecord, TokenStoreError> {
        let record = CredentialRecord::from_grant(grant, self.clock.now());
        self.store.save(&record).await?;
        tracing::info!(
            has_refresh_token = record.refresh_token.is_some(),
            expires_at = ?record.expires_at,
            "credential record stored"
        );
        Ok(record)
    }

    /// Stale path: serialize callers, re-check under the gate, refresh once.
    async fn refresh_stale(&self) -> Result<String, CredentialError> {
        let _gate = self.refresh_gate.lock().await;

        // A caller that lost the race finds the record already refreshed
        // here and returns it without touching the network.
        let record = match self.load_record().await {
            Some(record) => record,
            None => return self.fallback(),
        };
        if !record.is_stale(self.clock.now()) {
            return Ok(record.access_token);
        }

        let Some(refresh_token) = record.refresh_token.clone() else {
            // Grace-window policy: a stale token with no refresh token is
            // served as-is rather than failing hard.
            tracing::warn!(
                "access credential expired with no refresh token; serving the stale token"
            );
            return Ok(record.access_token);
        };

        tracing::info!("access credential stale; refreshing");
        let grant = self.oauth.refresh(&refresh_token).await.map_err(|err| {
            tracing::warn!(error = %err, "credential refresh failed");
            CredentialError::RefreshFailed(err.to_string())
        })?;

        let refreshed = CredentialRecord::from_grant(grant, self.clock.now());
        if let Err(err) = self.store.save(&refreshed).await {
            // The token itself is valid; losing the write only means the
            // next staleness episode refreshes again.
            tracing::error!(error = %err, "refreshed credential could not be persisted");
        } else {
            tracing::info!(expires_at = ?refreshed.expires_at, "access credential refreshed");
        }
        Ok(refreshed.access_token)
    }

    async fn load_record(&self) -> Option<CredentialRecord> {
        match self.store.load().await {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "token store unreadable; treating as no credential");
                None
            }
        }
    }

    fn fallback(&self) -> Result<String, CredentialError> {
        match &self.fallback_token {
            Some(token) => Ok(token.expose_secret().clone()),
            None => Err(CredentialError::AuthUnavailable),
        }
    }
}
