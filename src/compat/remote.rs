//! Per-service compatibility metadata published in the object store.
//!
//! Each object holds one top-level key, the service name, mapping to
//! optional `minVersion`, `deprecated` and `deprecationGrace` fields:
//!
//! ```json
//! { "analytics": { "minVersion": 2, "deprecated": 3, "deprecationGrace": 1767225600 } }
//! ```
//!
//! A negative `deprecationGrace` (conventionally `-1`) means no grace date.

use serde_json::{Map, Value};

use crate::document::json::json_i64;

/// Suffix of metadata object keys.
pub const METADATA_SUFFIX: &str = ".json";

/// Parsed metadata for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMetadata {
    pub service: String,
    pub min_version: Option<i64>,
    pub deprecated: Option<i64>,
    pub deprecation_grace: Option<u64>,
}

/// Why a metadata object was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InvalidJson,
    NotAnObject,
    NoKeys,
    ServiceNotAnObject,
    UnknownService,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::InvalidJson => "invalid_json",
            SkipReason::NotAnObject => "not_an_object",
            SkipReason::NoKeys => "no_keys",
            SkipReason::ServiceNotAnObject => "service_not_an_object",
            SkipReason::UnknownService => "unknown_service",
        }
    }
}

/// Namespace a listed key refers to, if it is a metadata object.
pub fn key_stem(key: &str) -> Option<&str> {
    key.strip_suffix(METADATA_SUFFIX).filter(|stem| !stem.is_empty())
}

/// Parse one metadata object body.
pub fn parse_metadata(body: &[u8]) -> Result<RemoteMetadata, SkipReason> {
    let value: Value = serde_json::from_slice(body).map_err(|_| SkipReason::InvalidJson)?;
    let Value::Object(root) = value else {
        return Err(SkipReason::NotAnObject);
    };

    let mut entries = root.into_iter();
    let (service, fields) = entries.next().ok_or(SkipReason::NoKeys)?;
    if entries.next().is_some() {
        tracing::warn!(service = %service, "Metadata object has several top-level keys, using the first");
    }

    let Value::Object(fields) = fields else {
        return Err(SkipReason::ServiceNotAnObject);
    };

    Ok(RemoteMetadata {
        service,
        min_version: json_i64(&fields, "minVersion"),
        deprecated: json_i64(&fields, "deprecated"),
        deprecation_grace: grace_timestamp(&fields),
    })
}

fn grace_timestamp(fields: &Map<String, Value>) -> Option<u64> {
    let raw = fields.get("deprecationGrace")?;
    let secs = raw.as_i64().or_else(|| raw.as_f64().map(|f| f as i64))?;
    u64::try_from(secs).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stem() {
        assert_eq!(key_stem("analytics.json"), Some("analytics"));
        assert_eq!(key_stem("analytics.json.bak"), None);
        assert_eq!(key_stem("README"), None);
        assert_eq!(key_stem(".json"), None);
    }

    #[test]
    fn test_parse_full() {
        let meta = parse_metadata(
            br#"{"analytics": {"minVersion": 2, "deprecated": 3, "deprecationGrace": 1767225600}}"#,
        )
        .unwrap();
        assert_eq!(
            meta,
            RemoteMetadata {
                service: "analytics".into(),
                min_version: Some(2),
                deprecated: Some(3),
                deprecation_grace: Some(1_767_225_600),
            }
        );
    }

    #[test]
    fn test_parse_optional_fields() {
        let meta = parse_metadata(br#"{"push": {"deprecationGrace": -1, "minVersion": "2"}}"#).unwrap();
        assert_eq!(meta.service, "push");
        assert_eq!(meta.min_version, None);
        assert_eq!(meta.deprecated, None);
        assert_eq!(meta.deprecation_grace, None);
    }

    #[test]
    fn test_fractional_grace() {
        let meta = parse_metadata(br#"{"push": {"deprecationGrace": 1700000000.5}}"#).unwrap();
        assert_eq!(meta.deprecation_grace, Some(1_700_000_000));
    }

    #[test]
    fn test_first_key_wins() {
        let meta = parse_metadata(br#"{"zeta": {"minVersion": 1}, "alpha": {}}"#).unwrap();
        assert_eq!(meta.service, "zeta");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse_metadata(b"not json"), Err(SkipReason::InvalidJson));
        assert_eq!(parse_metadata(b"[1]"), Err(SkipReason::NotAnObject));
        assert_eq!(parse_metadata(b"{}"), Err(SkipReason::NoKeys));
        assert_eq!(parse_metadata(br#"{"push": 3}"#), Err(SkipReason::ServiceNotAnObject));
    }
}
