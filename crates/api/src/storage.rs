//! Object store for uploaded files (fabric photos).
//!
//! Handlers talk to an [`ObjectStore`] held in [`AppState`](crate::state::AppState);
//! the server wires in a [`LocalObjectStore`] whose root directory is also
//! served read-only under `/media`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Errors raised by an object store backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid object key '{0}'")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Bucket/key addressed blob storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `bucket/key`, replacing any existing object.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Public URL the object can be fetched from.
    fn public_url(&self, bucket: &str, key: &str) -> String;

    /// Remove an object. Removing a missing object is not an error.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
}

/// Filesystem-backed store: `bucket/key` maps to `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    /// Base of public URLs, e.g. `http://localhost:3000/media`.
    media_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            media_base_url: format!("{}/media", public_base_url.trim_end_matches('/')),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        check_segment(bucket)?;
        check_segment(key)?;
        Ok(self.root.join(bucket).join(key))
    }
}

/// Bucket names and keys are single path segments: no separators, no `..`.
fn check_segment(segment: &str) -> Result<(), StorageError> {
    let valid = !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
        && !segment.contains('\0');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(segment.to_string()))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;
        tracing::debug!(bucket, key, content_type, size = bytes.len(), "Stored object");
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{bucket}/{key}", self.media_base_url)
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        let path = self.object_path(bucket, key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Object key of a stored URL: its last path segment.
pub fn key_from_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn put_then_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://localhost:3000/");

        store
            .put("fabric-images", "a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        let path = dir.path().join("fabric-images").join("a.png");
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);

        store.delete("fabric-images", "a.png").await.unwrap();
        assert!(!path.exists());
        // Deleting again is a no-op.
        store.delete("fabric-images", "a.png").await.unwrap();
    }

    #[test]
    fn public_url_joins_base_bucket_and_key() {
        let store = LocalObjectStore::new("/tmp/unused", "https://example.com");
        assert_eq!(
            store.public_url("fabric-images", "x.webp"),
            "https://example.com/media/fabric-images/x.webp"
        );
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "http://localhost:3000");
        let result = store.put("fabric-images", "../escape", vec![0], "x").await;
        assert_matches!(result, Err(StorageError::InvalidKey(_)));
        let result = store.delete("..", "a.png").await;
        assert_matches!(result, Err(StorageError::InvalidKey(_)));
    }

    #[test]
    fn key_is_last_url_segment() {
        assert_eq!(
            key_from_url("http://h/media/fabric-images/abc.png"),
            Some("abc.png")
        );
        assert_eq!(key_from_url("http://h/media/"), None);
    }
}
