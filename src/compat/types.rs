//! Compatibility verdict types and error definitions.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::resilience::CallError;
use crate::store::StoreError;

/// Compatibility state of one configured service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCompatibilityInfo {
    /// Namespace of the service, present locally and remotely.
    pub name: String,
    /// Locally configured version.
    pub config_version: i64,
    /// Oldest version the service still accepts.
    pub min_supported_version: Option<i64>,
    /// Newest version that is deprecated.
    pub deprecated_version: Option<i64>,
    /// Epoch seconds after which a deprecated version stops working.
    pub deprecation_grace: Option<u64>,
}

impl ServiceCompatibilityInfo {
    /// Local version is below the minimum supported one.
    pub fn is_incompatible(&self) -> bool {
        self.min_supported_version
            .is_some_and(|min| self.config_version < min)
    }

    /// Local version is at or below the deprecated one.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated_version
            .is_some_and(|deprecated| self.config_version <= deprecated)
    }

    /// Whether the grace period has ended at `now_secs`.
    pub fn grace_expired_at(&self, now_secs: u64) -> bool {
        self.deprecation_grace.is_some_and(|grace| grace <= now_secs)
    }

    /// Whether the grace period has ended, by the system clock.
    pub fn grace_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.grace_expired_at(now)
    }
}

/// Outcome of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub incompatible: Vec<ServiceCompatibilityInfo>,
    pub deprecated: Vec<ServiceCompatibilityInfo>,
}

impl ValidationResult {
    /// File a service under every list it belongs to.
    pub fn record(&mut self, info: ServiceCompatibilityInfo) {
        match (info.is_incompatible(), info.is_deprecated()) {
            (true, true) => {
                self.incompatible.push(info.clone());
                self.deprecated.push(info);
            }
            (true, false) => self.incompatible.push(info),
            (false, true) => self.deprecated.push(info),
            (false, false) => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.incompatible.is_empty() && self.deprecated.is_empty()
    }

    /// Any service the client must upgrade before it can work.
    pub fn has_incompatible(&self) -> bool {
        !self.incompatible.is_empty()
    }
}

/// Errors that abort a validation run.
#[derive(Debug, Clone, Error)]
pub enum CompatError {
    /// The object store could not be listed or read.
    #[error("object store request failed: {0}")]
    Transport(#[from] StoreError),

    /// An object store call missed its deadline on every attempt.
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// The caller cancelled the run.
    #[error("validation cancelled")]
    Cancelled,
}

impl From<CallError> for CompatError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Store(e) => CompatError::Transport(e),
            CallError::Timeout { operation, timeout } => CompatError::Timeout { operation, timeout },
        }
    }
}

/// Result type for validation.
pub type CompatResult<T> = Result<T, CompatError>;
