//! Settings schema definitions.
//!
//! Runtime settings for the configuration store and the compatibility
//! validator. All types derive Serde traits for deserialization from a TOML
//! settings file, and every section has defaults so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Where the bundled configuration document lives.
    pub document: DocumentConfig,

    /// Object store access for compatibility metadata.
    pub object_store: ObjectStoreConfig,

    /// Retry policy for object store calls.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Location of the bundled configuration document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Path to the JSON asset.
    pub path: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: "assets/sdk-config.json".to_string(),
        }
    }
}

/// Object store client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObjectStoreConfig {
    /// Deadline for each list/fetch call in seconds.
    pub request_timeout_secs: u64,

    /// Upper bound on in-flight metadata fetches.
    pub max_concurrent_fetches: usize,

    /// Custom endpoint (e.g. a local S3-compatible server).
    pub endpoint_url: Option<String>,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_concurrent_fetches: 4,
            endpoint_url: None,
        }
    }
}

impl ObjectStoreConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Retry policy for transient object store failures.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    /// Attempts actually made, honoring `enabled`.
    pub fn effective_attempts(&self) -> u32 {
        if self.enabled {
            self.max_attempts.max(1)
        } else {
            1
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Record metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.document.path, "assets/sdk-config.json");
        assert_eq!(settings.object_store.request_timeout_secs, 10);
        assert_eq!(settings.object_store.max_concurrent_fetches, 4);
        assert!(settings.object_store.endpoint_url.is_none());
        assert_eq!(settings.retries.max_attempts, 3);
        assert_eq!(settings.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_sections() {
        let settings: Settings = toml::from_str(
            r#"
            [object_store]
            endpoint_url = "http://127.0.0.1:9000"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(settings.object_store.request_timeout_secs, 10);
        assert_eq!(
            settings.object_store.endpoint_url.as_deref(),
            Some("http://127.0.0.1:9000")
        );
        assert_eq!(settings.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_disabled_retries_make_one_attempt() {
        let retries = RetryConfig {
            enabled: false,
            max_attempts: 5,
            ..RetryConfig::default()
        };
        assert_eq!(retries.effective_attempts(), 1);
    }
}
