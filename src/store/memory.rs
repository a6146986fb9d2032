//! In-memory object store.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::document::ObjectStoreEndpoint;
use crate::store::{ObjectStore, ObjectStoreProvider, StoreError, StoreResult};

/// A bucket kept in memory, listed in insertion order.
///
/// Cloning shares the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<Vec<(String, Vec<u8>)>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an object. A replaced key keeps its listing position.
    pub fn insert(&self, key: impl Into<String>, body: impl Into<Vec<u8>>) {
        let key = key.into();
        let body = body.into();
        let mut objects = self.objects.write().unwrap_or_else(|e| e.into_inner());
        match objects.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = body,
            None => objects.push((key, body)),
        }
    }

    pub fn with_object(self, key: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(key, body);
        self
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list_objects(&self) -> StoreResult<Vec<String>> {
        let objects = self.objects.read().unwrap_or_else(|e| e.into_inner());
        Ok(objects.iter().map(|(k, _)| k.clone()).collect())
    }

    async fn get_object(&self, key: &str) -> StoreResult<Vec<u8>> {
        let objects = self.objects.read().unwrap_or_else(|e| e.into_inner());
        objects
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, body)| body.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}

#[async_trait]
impl ObjectStoreProvider for MemoryObjectStore {
    async fn open(&self, endpoint: &ObjectStoreEndpoint) -> StoreResult<Arc<dyn ObjectStore>> {
        tracing::debug!(region = %endpoint.region, bucket = %endpoint.bucket, "Opening in-memory object store");
        Ok(Arc::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listing_preserves_insertion_order() {
        let store = MemoryObjectStore::new()
            .with_object("b.json", "{}")
            .with_object("a.json", "{}")
            .with_object("b.json", "{\"b\": {}}");

        assert_eq!(store.len(), 2);
        assert_eq!(store.list_objects().await.unwrap(), vec!["b.json", "a.json"]);
        assert_eq!(store.get_object("b.json").await.unwrap(), b"{\"b\": {}}".to_vec());
    }

    #[tokio::test]
    async fn test_missing_key() {
        let store = MemoryObjectStore::new();
        assert!(store.is_empty());
        let err = store.get_object("nope.json").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref k) if k == "nope.json"));
    }
}
