//! Compatibility validation against remote metadata.
//!
//! # Responsibilities
//! - Resolve the metadata bucket from the identity namespace
//! - List the bucket and fetch only metadata for locally configured services
//! - Compare local versions with the published minimum/deprecated versions
//!
//! # Failure Handling
//! - No bucket configured: empty result, no network access
//! - Listing or fetch failure (after retries): the whole run fails
//! - A malformed metadata object: skipped, the run continues

use futures_util::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::compat::remote::{key_stem, parse_metadata, SkipReason};
use crate::compat::types::{CompatError, CompatResult, ServiceCompatibilityInfo, ValidationResult};
use crate::config::Settings;
use crate::document::ConfigStore;
use crate::observability::metrics;
use crate::resilience::{with_retry, RetryPolicy};
use crate::store::ObjectStoreProvider;

/// Tuning for a validator.
#[derive(Debug, Clone)]
pub struct ValidatorSettings {
    /// Deadline and retry behaviour of each object store call.
    pub retry: RetryPolicy,
    /// Upper bound on in-flight metadata fetches.
    pub max_concurrent_fetches: usize,
}

impl ValidatorSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            retry: RetryPolicy::from_config(&settings.retries, &settings.object_store),
            max_concurrent_fetches: settings.object_store.max_concurrent_fetches,
        }
    }
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Checks configured service versions against published metadata.
pub struct CompatibilityValidator {
    store: Arc<ConfigStore>,
    provider: Arc<dyn ObjectStoreProvider>,
    settings: ValidatorSettings,
}

impl CompatibilityValidator {
    pub fn new(
        store: Arc<ConfigStore>,
        provider: Arc<dyn ObjectStoreProvider>,
        settings: ValidatorSettings,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Validate every configured service that has published metadata.
    ///
    /// Returns an empty result when the document names no metadata bucket.
    pub async fn validate_config(&self) -> CompatResult<ValidationResult> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("validate_config", run_id = %run_id);
        let started = Instant::now();

        let result = self.run().instrument(span).await;

        let outcome = match &result {
            Ok(r) if r.is_empty() => "clean",
            Ok(_) => "flagged",
            Err(_) => "error",
        };
        metrics::record_validation(outcome, started);
        result
    }

    /// Like [`validate_config`](Self::validate_config), aborting with
    /// [`CompatError::Cancelled`] once `cancel` fires.
    pub async fn validate_config_with_cancellation(
        &self,
        cancel: &CancellationToken,
    ) -> CompatResult<ValidationResult> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Validation cancelled by caller");
                Err(CompatError::Cancelled)
            }
            result = self.validate_config() => result,
        }
    }

    async fn run(&self) -> CompatResult<ValidationResult> {
        let Some(endpoint) = self.store.object_store_endpoint() else {
            tracing::info!("No compatibility bucket configured, skipping validation");
            return Ok(ValidationResult::default());
        };

        let policy = &self.settings.retry;
        let bucket = with_retry("open", policy, || self.provider.open(&endpoint)).await?;

        let keys = with_retry("list_objects", policy, || bucket.list_objects()).await?;
        let candidates: Vec<&str> = keys
            .iter()
            .map(String::as_str)
            .filter(|key| key_stem(key).is_some_and(|stem| self.store.contains_namespace(stem)))
            .collect();

        tracing::info!(
            region = %endpoint.region,
            bucket = %endpoint.bucket,
            listed = keys.len(),
            candidates = candidates.len(),
            "Listed compatibility metadata"
        );

        // `buffered` yields in input order, so results follow the listing.
        let bodies: Vec<(&str, Vec<u8>)> = stream::iter(candidates)
            .map(|key| {
                let bucket = &bucket;
                async move {
                    metrics::record_remote_fetch();
                    let body = with_retry("get_object", policy, || bucket.get_object(key)).await?;
                    Ok::<_, CompatError>((key, body))
                }
            })
            .buffered(self.settings.max_concurrent_fetches.max(1))
            .try_collect()
            .await?;

        let mut result = ValidationResult::default();
        for (key, body) in bodies {
            match self.evaluate(&body) {
                Ok(info) => {
                    tracing::debug!(
                        service = %info.name,
                        version = info.config_version,
                        min_version = ?info.min_supported_version,
                        deprecated = ?info.deprecated_version,
                        "Evaluated service"
                    );
                    if info.is_incompatible() {
                        tracing::warn!(service = %info.name, version = info.config_version, "Configuration version no longer supported");
                        metrics::record_flagged_service("incompatible");
                    }
                    if info.is_deprecated() {
                        tracing::warn!(service = %info.name, version = info.config_version, grace = ?info.deprecation_grace, "Configuration version deprecated");
                        metrics::record_flagged_service("deprecated");
                    }
                    result.record(info);
                }
                Err(reason) => {
                    tracing::debug!(key, reason = reason.as_str(), "Skipping metadata object");
                    metrics::record_skipped_document(reason.as_str());
                }
            }
        }

        Ok(result)
    }

    fn evaluate(&self, body: &[u8]) -> Result<ServiceCompatibilityInfo, SkipReason> {
        let meta = parse_metadata(body)?;
        if !self.store.contains_namespace(&meta.service) {
            return Err(SkipReason::UnknownService);
        }

        Ok(ServiceCompatibilityInfo {
            config_version: self.store.service_version(&meta.service),
            name: meta.service,
            min_supported_version: meta.min_version,
            deprecated_version: meta.deprecated,
            deprecation_grace: meta.deprecation_grace,
        })
    }
}

impl std::fmt::Debug for CompatibilityValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatibilityValidator")
            .field("endpoint", &self.store.object_store_endpoint())
            .field("settings", &self.settings)
            .finish()
    }
}
