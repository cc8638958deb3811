//! TokenStore port - durable holder of the current credential record.
//!
//! The store holds at most one record. Writes must be atomic from the
//! perspective of readers: a concurrent load never observes a partially
//! written record.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::credential::CredentialRecord;

/// Errors from the backing store.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// The store exists but could not be read or decoded. Callers treat
    /// this the same as "no credential".
    #[error("token store unreadable: {0}")]
    Unreadable(String),

    /// The record could not be persisted.
    #[error("token store write failed: {0}")]
    WriteFailed(String),
}

/// Port for persisting the single credential record.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the current record. `None` when no credential has been stored
    /// yet.
    async fn load(&self) -> Result<Option<CredentialRecord>, TokenStoreError>;

    /// Replace the stored record atomically.
    async fn save(&self, record: &CredentialRecord) -> Result<(), TokenStoreError>;
}
