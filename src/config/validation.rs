//! Settings validation.
//!
//! Serde handles syntax; this module checks value ranges and that the
//! endpoint override is a usable URL. All problems are reported, not just
//! the first one.

use thiserror::Error;
use url::Url;

use crate::config::schema::Settings;

/// A single semantic problem in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsValidationError {
    #[error("document.path must not be empty")]
    EmptyDocumentPath,

    #[error("object_store.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("object_store.max_concurrent_fetches must be at least 1")]
    ZeroConcurrency,

    #[error("object_store.endpoint_url '{url}' is invalid: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("retries.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    BackoffRange { base: u64, max: u64 },
}

/// Validate settings, collecting every error.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<SettingsValidationError>> {
    let mut errors = Vec::new();

    if settings.document.path.trim().is_empty() {
        errors.push(SettingsValidationError::EmptyDocumentPath);
    }

    let store = &settings.object_store;
    if store.request_timeout_secs == 0 {
        errors.push(SettingsValidationError::ZeroTimeout);
    }
    if store.max_concurrent_fetches == 0 {
        errors.push(SettingsValidationError::ZeroConcurrency);
    }
    if let Some(raw) = &store.endpoint_url {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(SettingsValidationError::InvalidEndpoint {
                url: raw.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(SettingsValidationError::InvalidEndpoint {
                url: raw.clone(),
                reason: e.to_string(),
            }),
        }
    }

    let retries = &settings.retries;
    if retries.max_attempts == 0 {
        errors.push(SettingsValidationError::ZeroAttempts);
    }
    if retries.base_delay_ms > retries.max_delay_ms {
        errors.push(SettingsValidationError::BackoffRange {
            base: retries.base_delay_ms,
            max: retries.max_delay_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let mut settings = Settings::default();
        settings.document.path = "  ".into();
        settings.object_store.request_timeout_secs = 0;
        settings.object_store.max_concurrent_fetches = 0;
        settings.retries.max_attempts = 0;
        settings.retries.base_delay_ms = 5000;

        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&SettingsValidationError::EmptyDocumentPath));
        assert!(errors.contains(&SettingsValidationError::ZeroTimeout));
        assert!(errors.contains(&SettingsValidationError::ZeroConcurrency));
        assert!(errors.contains(&SettingsValidationError::ZeroAttempts));
        assert!(errors.contains(&SettingsValidationError::BackoffRange { base: 5000, max: 2000 }));
    }

    #[test]
    fn test_endpoint_url_checks() {
        let mut settings = Settings::default();
        settings.object_store.endpoint_url = Some("http://localhost:9000".into());
        assert!(validate_settings(&settings).is_ok());

        settings.object_store.endpoint_url = Some("not a url".into());
        let errors = validate_settings(&settings).unwrap_err();
        assert!(matches!(errors[0], SettingsValidationError::InvalidEndpoint { .. }));

        settings.object_store.endpoint_url = Some("ftp://localhost".into());
        let errors = validate_settings(&settings).unwrap_err();
        assert!(errors[0].to_string().contains("unsupported scheme 'ftp'"));
    }
}
