//! File-backed token store.
//!
//! Persists the single credential record as a JSON file. Writes go to a
//! sibling temp file first and are renamed into place, so a concurrent
//! reader sees either the old record or the new one, never a torn write.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::domain::credential::CredentialRecord;
use crate::ports::{TokenStore, TokenStoreError};

/// JSON-file implementation of `TokenStore`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the given file path (e.g. `tokens.json`).
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<CredentialRecord>, TokenStoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(TokenStoreError::Unreadable(err.to_string())),
        };

        let record = serde_json::from_slice(&bytes)
            .map_err(|err| TokenStoreError::Unreadable(err.to_string()))?;
        Ok(Some(record))
    }

    async fn save(&self, record: &CredentialRecord) -> Result<(), TokenStoreError> {
        let json = serde_json::to_vec_pretty(record)
            .map_err(|err| TokenStoreError::WriteFailed(err.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|err| TokenStoreError::WriteFailed(err.to_string()))?;
            }
        }

        let temp = self.temp_path();
        fs::write(&temp, json)
            .await
            .map_err(|err| TokenStoreError::WriteFailed(err.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|err| TokenStoreError::WriteFailed(err.to_string()))?;

        Ok(())
    }
}
