//! Directory-backed object store. Buckets are subdirectories of the root and
//! keys are relative paths inside them.

use super::{ObjectStore, StorageLocator};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path for an object, rejecting keys that escape the bucket
    pub fn object_path(&self, bucket: &str, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let is_plain = |path: &Path| {
            path.components()
                .all(|component| matches!(component, Component::Normal(_)))
        };
        if bucket.is_empty() || key.is_empty() || !is_plain(Path::new(bucket)) || !is_plain(relative) {
            return None;
        }
        Some(self.root.join(bucket).join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn get_object(&self, locator: &StorageLocator) -> Result<Vec<u8>> {
        let path = self
            .object_path(&locator.bucket, &locator.key)
            .ok_or_else(|| ReportError::result_fetch(format!("Invalid object key: {locator}")))?;

        tokio::fs::read(&path).await.map_err(|e| {
            ReportError::result_fetch(format!("Unable to read {}: {e}", path.display()))
        })
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let path = self.object_path(bucket, key).ok_or_else(|| {
            ReportError::publish("put_object", format!("Invalid object key: {bucket}/{key}"))
        })?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ReportError::publish(
                    "put_object",
                    format!("Unable to create {}: {e}", parent.display()),
                )
            })?;
        }

        let size = body.len();
        tokio::fs::write(&path, body).await.map_err(|e| {
            ReportError::publish("put_object", format!("Unable to write {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), bytes = size, "Object written");
        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String> {
        let path = self.object_path(bucket, key).ok_or_else(|| {
            ReportError::publish("presign_get", format!("Invalid object key: {bucket}/{key}"))
        })?;

        let metadata = tokio::fs::metadata(&path).await.map_err(|e| {
            ReportError::publish("presign_get", format!("{}: {e}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(ReportError::publish(
                "presign_get",
                format!("{} is not a file", path.display()),
            ));
        }

        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| ReportError::publish("presign_get", format!("Invalid link TTL: {e}")))?;
        let expires = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| {
                ReportError::publish("presign_get", format!("Link TTL out of range: {}s", ttl.num_seconds()))
            })?
            .format("%Y%m%dT%H%M%SZ");

        Ok(format!("file://{}?expires={expires}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_get_presign() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());

        store
            .put_object("reports", "alb-reports/report.txt", b"body".to_vec())
            .await
            .unwrap();

        let body = store
            .get_object(&StorageLocator::new("reports", "alb-reports/report.txt"))
            .await
            .unwrap();
        assert_eq!(body, b"body");

        let url = store
            .presign_get("reports", "alb-reports/report.txt", Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.contains("alb-reports/report.txt?expires="));
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());

        assert!(store.object_path("reports", "../secrets").is_none());
        assert!(store.object_path("..", "key").is_none());
        assert!(store.object_path("reports", "/etc/passwd").is_none());

        let err = store
            .put_object("reports", "../escape.txt", Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.error_kind(), "PublishError");
    }

    #[tokio::test]
    async fn test_presign_missing_object_fails() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());
        assert!(store
            .presign_get("reports", "missing.txt", Duration::from_secs(60))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_presign_with_unrepresentable_ttl_is_publish_error() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());
        store
            .put_object("reports", "report.txt", b"body".to_vec())
            .await
            .unwrap();

        let err = store
            .presign_get("reports", "report.txt", Duration::from_secs(9_000_000_000_000))
            .await
            .unwrap_err();
        assert_eq!(err.error_kind(), "PublishError");
    }
}
