//! Deadline and retry wrapper for object store calls.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use crate::config::{ObjectStoreConfig, RetryConfig};
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::store::StoreError;

/// How a single remote call is bounded and retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, at least 1.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Deadline for each attempt.
    pub request_timeout: Duration,
}

impl RetryPolicy {
    pub fn from_config(retries: &RetryConfig, store: &ObjectStoreConfig) -> Self {
        Self {
            max_attempts: retries.effective_attempts(),
            base_delay_ms: retries.base_delay_ms,
            max_delay_ms: retries.max_delay_ms,
            request_timeout: store.request_timeout(),
        }
    }

    /// One attempt, no backoff.
    pub fn no_retry(request_timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
            request_timeout,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default(), &ObjectStoreConfig::default())
    }
}

/// Final failure of a bounded call.
#[derive(Debug, Clone, Error)]
pub enum CallError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

impl CallError {
    fn is_retryable(&self) -> bool {
        match self {
            CallError::Store(e) => e.is_retryable(),
            CallError::Timeout { .. } => true,
        }
    }
}

/// Run `call` under the policy's deadline, retrying transient failures.
///
/// The last error is returned once attempts run out.
pub async fn with_retry<T, F, Fut>(
    operation: &'static str,
    policy: &RetryPolicy,
    mut call: F,
) -> Result<T, CallError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let err = match timeout(policy.request_timeout, call()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => CallError::Store(e),
            Err(_) => CallError::Timeout {
                operation,
                timeout: policy.request_timeout,
            },
        };

        if attempt >= max_attempts || !err.is_retryable() {
            return Err(err);
        }

        let delay = calculate_backoff(attempt, policy.base_delay_ms, policy.max_delay_ms);
        tracing::info!(operation, attempt, delay = ?delay, error = %err, "Retrying object store call");
        metrics::record_store_retry(operation);
        tokio::time::sleep(delay).await;
    }
}
