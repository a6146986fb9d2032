//! Metrics collection.
//!
//! Metrics go through the `metrics` facade; the embedding application
//! installs whichever recorder/exporter it uses. Without one, every call
//! here is a no-op.
//!
//! # Metrics
//! - `sdk_config_validations_total` (counter): validation runs by outcome
//! - `sdk_config_validation_duration_seconds` (histogram): run latency
//! - `sdk_config_remote_fetches_total` (counter): metadata objects fetched
//! - `sdk_config_remote_documents_skipped_total` (counter): malformed metadata by reason
//! - `sdk_config_services_flagged_total` (counter): services by kind (incompatible/deprecated)
//! - `sdk_config_store_retries_total` (counter): retried object store calls by operation

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn metric recording on or off process-wide.
pub fn init_metrics(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
    tracing::debug!(enabled, "Metrics recording configured");
}

fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn record_validation(outcome: &'static str, started: Instant) {
    if !enabled() {
        return;
    }
    metrics::counter!("sdk_config_validations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("sdk_config_validation_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

pub fn record_remote_fetch() {
    if enabled() {
        metrics::counter!("sdk_config_remote_fetches_total").increment(1);
    }
}

pub fn record_skipped_document(reason: &'static str) {
    if enabled() {
        metrics::counter!("sdk_config_remote_documents_skipped_total", "reason" => reason)
            .increment(1);
    }
}

pub fn record_flagged_service(kind: &'static str) {
    if enabled() {
        metrics::counter!("sdk_config_services_flagged_total", "kind" => kind).increment(1);
    }
}

pub fn record_store_retry(operation: &'static str) {
    if enabled() {
        metrics::counter!("sdk_config_store_retries_total", "operation" => operation).increment(1);
    }
}
