//! Media Storage Module
//!
//! Filesystem-backed blob store for profile images. References handed out
//! to callers (and persisted in profile rows) are opaque uuid strings;
//! resolving a reference back to a path requires it to parse as a uuid,
//! which also rules out path traversal.

use std::path::PathBuf;

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("empty blob")]
    EmptyBlob,

    #[error("blob of {size} bytes exceeds maximum of {max}")]
    BlobTooLarge { size: usize, max: usize },

    #[error("invalid media reference '{0}'")]
    InvalidReference(String),

    #[error("media '{0}' not found")]
    NotFound(String),

    #[error("media storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    base_path: PathBuf,
    max_size: usize,
}

impl MediaStore {
    pub async fn new(base_path: PathBuf, max_size: usize) -> Result<Self, MediaError> {
        fs::create_dir_all(&base_path).await?;

        info!(path = %base_path.display(), "Media store initialized");

        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Store image bytes and return an opaque reference.
    pub async fn store(&self, data: &[u8]) -> Result<String, MediaError> {
        if data.is_empty() {
            return Err(MediaError::EmptyBlob);
        }
        if data.len() > self.max_size {
            return Err(MediaError::BlobTooLarge {
                size: data.len(),
                max: self.max_size,
            });
        }

        let id = Uuid::new_v4();
        let path = self.base_path.join(id.to_string());

        fs::write(&path, data).await?;

        debug!(reference = %id, size = data.len(), "Stored image blob");
        Ok(id.to_string())
    }

    /// Read image bytes back by reference.
    pub async fn get(&self, reference: &str) -> Result<Vec<u8>, MediaError> {
        let path = self.resolve(reference)?;

        if !path.exists() {
            return Err(MediaError::NotFound(reference.to_string()));
        }

        let data = fs::read(&path).await?;

        debug!(reference, size = data.len(), "Retrieved image blob");
        Ok(data)
    }

    /// Delete an image blob. Deleting a reference that is already gone is
    /// reported as `NotFound` so callers can tell the two apart.
    pub async fn delete(&self, reference: &str) -> Result<(), MediaError> {
        let path = self.resolve(reference)?;

        if !path.exists() {
            return Err(MediaError::NotFound(reference.to_string()));
        }

        fs::remove_file(&path).await?;

        debug!(reference, "Deleted image blob");
        Ok(())
    }

    /// References must be bare uuids; anything else (separators, `..`)
    /// cannot name a file under the base directory.
    fn resolve(&self, reference: &str) -> Result<PathBuf, MediaError> {
        let id = Uuid::parse_str(reference)
            .map_err(|_| MediaError::InvalidReference(reference.to_string()))?;
        Ok(self.base_path.join(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_store() -> (MediaStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf(), 1024 * 1024)
            .await
            .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let (store, _dir) = test_store().await;
        let data = b"fake-jpeg-bytes";

        let reference = store.store(data).await.unwrap();
        let retrieved = store.get(&reference).await.unwrap();
        assert_eq!(retrieved, data);
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _dir) = test_store().await;
        let reference = store.store(b"delete-me").await.unwrap();

        store.delete(&reference).await.unwrap();
        assert!(matches!(
            store.get(&reference).await,
            Err(MediaError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_not_idempotent() {
        let (store, _dir) = test_store().await;
        let reference = store.store(b"once").await.unwrap();

        store.delete(&reference).await.unwrap();
        // A second delete of the same reference reports NotFound.
        assert!(matches!(
            store.delete(&reference).await,
            Err(MediaError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_blob_rejected() {
        let (store, _dir) = test_store().await;
        assert!(matches!(
            store.store(b"").await,
            Err(MediaError::EmptyBlob)
        ));
    }

    #[tokio::test]
    async fn test_oversized_blob_rejected() {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf(), 8).await.unwrap();
        assert!(matches!(
            store.store(b"way-more-than-eight-bytes").await,
            Err(MediaError::BlobTooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_traversal_reference_rejected() {
        let (store, _dir) = test_store().await;
        assert!(matches!(
            store.delete("../../etc/passwd").await,
            Err(MediaError::InvalidReference(_))
        ));
        assert!(matches!(
            store.get("not-a-uuid").await,
            Err(MediaError::InvalidReference(_))
        ));
    }
}
