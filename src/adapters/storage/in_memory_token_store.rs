//! In-memory token store for tests and ephemeral deployments.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::credential::CredentialRecord;
use crate::ports::{TokenStore, TokenStoreError};

/// Volatile `TokenStore` holding the record in process memory.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    record: RwLock<Option<CredentialRecord>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store with a record.
    pub fn seeded(record: CredentialRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<CredentialRecord>, TokenStoreError> {
        Ok(self.record.read().await.clone())
    }

    async fn save(&self, record: &CredentialRecord) -> Result<(), TokenStoreError> {
        *self.record.write().await = Some(record.clone());
        Ok(())
    }
}
