//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sdk_config::compat::{CompatibilityValidator, ValidatorSettings};
use sdk_config::resilience::RetryPolicy;
use sdk_config::store::{MemoryObjectStore, ObjectStore, ObjectStoreProvider, StoreError, StoreResult};
use sdk_config::{ConfigStore, ObjectStoreEndpoint};

/// Document naming a compatibility bucket plus a few services.
pub const DOCUMENT: &str = r#"{
    "identity": {
        "version": 2,
        "compatibility": { "region": "us-east-1", "bucket": "sdk-compat" }
    },
    "analytics": { "version": 2, "endpoint": "https://collect.example.com" },
    "push": { "version": 5 },
    "storage": { "bucket": "user-files" }
}"#;

/// Wraps a memory bucket, recording provider/list/fetch calls and
/// optionally injecting failures or latency.
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub inner: MemoryObjectStore,
    pub opened: Arc<AtomicU32>,
    pub listings: Arc<AtomicU32>,
    pub fetched: Arc<Mutex<Vec<String>>>,
    /// Listing fails this many times before succeeding.
    pub list_failures: Arc<AtomicU32>,
    /// Keys whose fetch always fails.
    pub failing_keys: Arc<Mutex<Vec<String>>>,
    /// Per-key fetch latency.
    pub delays: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl RecordingStore {
    pub fn new(inner: MemoryObjectStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn fail_listing(self, times: u32) -> Self {
        self.list_failures.store(times, Ordering::SeqCst);
        self
    }

    pub fn fail_fetch(self, key: &str) -> Self {
        self.failing_keys.lock().unwrap().push(key.to_string());
        self
    }

    pub fn delay_fetch(self, key: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().push((key.to_string(), delay));
        self
    }

    pub fn fetched_keys(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn open_count(&self) -> u32 {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn listing_count(&self) -> u32 {
        self.listings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn list_objects(&self) -> StoreResult<Vec<String>> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        let remaining = self.list_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.list_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::transport("list_objects", "connection refused"));
        }
        self.inner.list_objects().await
    }

    async fn get_object(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.fetched.lock().unwrap().push(key.to_string());

        let delay = self
            .delays
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, d)| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_keys.lock().unwrap().iter().any(|k| k == key) {
            return Err(StoreError::transport("get_object", "connection reset"));
        }
        self.inner.get_object(key).await
    }
}

#[async_trait]
impl ObjectStoreProvider for RecordingStore {
    async fn open(&self, _endpoint: &ObjectStoreEndpoint) -> StoreResult<Arc<dyn ObjectStore>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(self.clone()))
    }
}

/// Fast retries so failure tests stay quick.
pub fn fast_settings(max_attempts: u32) -> ValidatorSettings {
    ValidatorSettings {
        retry: RetryPolicy {
            max_attempts,
            base_delay_ms: 1,
            max_delay_ms: 5,
            request_timeout: Duration::from_millis(500),
        },
        max_concurrent_fetches: 4,
    }
}

pub fn validator_for(
    document: &str,
    store: &RecordingStore,
    settings: ValidatorSettings,
) -> CompatibilityValidator {
    let config = Arc::new(ConfigStore::from_json_str(document).unwrap());
    CompatibilityValidator::new(config, Arc::new(store.clone()), settings)
}
