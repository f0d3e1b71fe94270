//! # Object Storage
//!
//! Object store collaborator used for reading query results and storing the
//! rendered report, plus the `s3://bucket/key` locator type shared by both.

pub mod local;
pub mod memory;

pub use local::LocalObjectStore;
pub use memory::InMemoryObjectStore;

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

const S3_SCHEME: &str = "s3://";

/// Bucket and key of a stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocator {
    pub bucket: String,
    pub key: String,
}

impl StorageLocator {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse an `s3://bucket[/prefix]` location. The key of the result is a
    /// prefix: empty, or ending in `/`. `None` when the scheme or bucket is
    /// missing.
    pub fn parse_prefix(location: &str) -> Option<Self> {
        let rest = location.strip_prefix(S3_SCHEME)?;
        let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return None;
        }

        let prefix = if prefix.is_empty() || prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{prefix}/")
        };
        Some(Self::new(bucket, prefix))
    }

    /// Locator of `name` under this prefix
    pub fn join(&self, name: &str) -> Self {
        Self::new(self.bucket.clone(), format!("{}{name}", self.key))
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{S3_SCHEME}{}/{}", self.bucket, self.key)
    }
}

/// Object storage operations the report job needs
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, locator: &StorageLocator) -> Result<Vec<u8>>;

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;

    /// A download link for the object that stops working after `ttl`
    async fn presign_get(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String>;
}
