use super::{ObjectStore, StorageLocator};
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Process-local object store. Cloning shares the underlying objects.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<Mutex<HashMap<StorageLocator, Vec<u8>>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, locator: StorageLocator, body: impl Into<Vec<u8>>) {
        self.lock().insert(locator, body.into());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.lock().get(&StorageLocator::new(bucket, key)).cloned()
    }

    pub fn keys(&self) -> Vec<StorageLocator> {
        let mut keys: Vec<_> = self.lock().keys().cloned().collect();
        keys.sort_by(|a, b| (&a.bucket, &a.key).cmp(&(&b.bucket, &b.key)));
        keys
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StorageLocator, Vec<u8>>> {
        // A poisoned map still holds consistent objects
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_object(&self, locator: &StorageLocator) -> Result<Vec<u8>> {
        self.lock()
            .get(locator)
            .cloned()
            .ok_or_else(|| ReportError::result_fetch(format!("No such object: {locator}")))
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.insert(StorageLocator::new(bucket, key), body);
        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String> {
        let locator = StorageLocator::new(bucket, key);
        if !self.lock().contains_key(&locator) {
            return Err(ReportError::publish(
                "presign_get",
                format!("No such object: {locator}"),
            ));
        }
        Ok(format!("memory://{bucket}/{key}?expires_in={}", ttl.as_secs()))
    }
}
