//! Object store access for remote compatibility metadata.
//!
//! # Data Flow
//! ```text
//! ObjectStoreEndpoint (region + bucket, from the document)
//!     → ObjectStoreProvider::open
//!     → ObjectStore::list_objects / get_object
//! ```
//!
//! # Backends
//! - `s3.rs`: anonymous read-only S3 (feature `s3-backend`)
//! - `memory.rs`: ordered in-memory bucket for offline use and tests

pub mod memory;
#[cfg(feature = "s3-backend")]
pub mod s3;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::document::ObjectStoreEndpoint;

pub use memory::MemoryObjectStore;
#[cfg(feature = "s3-backend")]
pub use s3::{S3ObjectStore, S3Provider};

/// Errors raised by an object store backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached or rejected the request.
    #[error("{operation} failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    /// The requested key does not exist.
    #[error("object not found: {0}")]
    NotFound(String),
}

impl StoreError {
    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
        }
    }

    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Result type for object store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only view of one bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// All keys in the bucket, in the order the store lists them.
    async fn list_objects(&self) -> StoreResult<Vec<String>>;

    /// Body of the object stored under `key`.
    async fn get_object(&self, key: &str) -> StoreResult<Vec<u8>>;
}

/// Opens an [`ObjectStore`] for an endpoint named by the document.
#[async_trait]
pub trait ObjectStoreProvider: Send + Sync {
    async fn open(&self, endpoint: &ObjectStoreEndpoint) -> StoreResult<Arc<dyn ObjectStore>>;
}
