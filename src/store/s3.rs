//! Anonymous, read-only S3 backend.
//!
//! Compatibility metadata is published to a public bucket, so the client is
//! built without credentials. An endpoint override switches to path-style
//! addressing for S3-compatible servers.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client as S3Client;
use std::sync::Arc;

use crate::document::ObjectStoreEndpoint;
use crate::store::{ObjectStore, ObjectStoreProvider, StoreError, StoreResult};

/// S3 bucket reader.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Wrap an existing client.
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build an anonymous client for `endpoint`.
    pub async fn connect(endpoint: &ObjectStoreEndpoint, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(endpoint.region.clone()))
            .no_credentials();
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(endpoint_url.is_some())
            .build();

        tracing::debug!(
            region = %endpoint.region,
            bucket = %endpoint.bucket,
            endpoint_url = ?endpoint_url,
            "S3 client configured"
        );

        Self::new(S3Client::from_conf(s3_config), endpoint.bucket.clone())
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_objects(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| StoreError::transport("list_objects", DisplayErrorContext(&e).to_string()))?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_owned)),
            );

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_owned());
                }
                _ => break,
            }
        }

        tracing::debug!(bucket = %self.bucket, count = keys.len(), "Listed bucket");
        Ok(keys)
    }

    async fn get_object(&self, key: &str) -> StoreResult<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StoreError::NotFound(key.to_string())
                } else {
                    StoreError::transport("get_object", DisplayErrorContext(&e).to_string())
                }
            })?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::transport("get_object", e.to_string()))?;

        Ok(body.into_bytes().to_vec())
    }
}

/// Opens an [`S3ObjectStore`] per endpoint.
#[derive(Debug, Clone, Default)]
pub struct S3Provider {
    endpoint_url: Option<String>,
}

impl S3Provider {
    pub fn new(endpoint_url: Option<String>) -> Self {
        Self { endpoint_url }
    }
}

#[async_trait]
impl ObjectStoreProvider for S3Provider {
    async fn open(&self, endpoint: &ObjectStoreEndpoint) -> StoreResult<Arc<dyn ObjectStore>> {
        let store = S3ObjectStore::connect(endpoint, self.endpoint_url.as_deref()).await;
        Ok(Arc::new(store))
    }
}
