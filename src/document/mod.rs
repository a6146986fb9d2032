//! Bundled configuration document and namespace lookups.
//!
//! # Data Flow
//! ```text
//! JSON asset (namespace → object)
//!     → ConfigStore::open (read + parse, exactly once)
//!     → Arc<ConfigStore> shared with every calling SDK
//!     → get_config_set(namespace) → Option<&Map>
//! ```
//!
//! A document that cannot be loaded does not stop the process. The failure
//! is logged once and every lookup answers `None` afterwards.

pub mod json;

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use json::{json_i64, json_object, json_str};

/// Namespace holding the identity service settings.
pub const IDENTITY_NAMESPACE: &str = "identity";

/// Key inside the identity namespace naming the compatibility bucket.
pub const COMPATIBILITY_KEY: &str = "compatibility";

/// Version assumed for a namespace that does not declare one.
pub const DEFAULT_CONFIG_VERSION: i64 = 1;

/// Immutable namespace → value mapping.
pub type ConfigurationDocument = Map<String, Value>;

/// Why the bundled document could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("top-level value must be an object, found {0}")]
    NotAnObject(&'static str),
}

/// Region and bucket publishing compatibility metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStoreEndpoint {
    pub region: String,
    pub bucket: String,
}

/// Owner of the parsed configuration document.
#[derive(Debug)]
pub struct ConfigStore {
    document: Option<ConfigurationDocument>,
    load_error: Option<ConfigLoadError>,
}

impl ConfigStore {
    /// Load the document at `path`, degrading to an empty store on failure.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_open(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Configuration document unavailable, lookups will be empty");
                Self {
                    document: None,
                    load_error: Some(e),
                }
            }
        }
    }

    /// Load the document at `path`, returning the failure to the caller.
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json_str(&content)?;
        tracing::info!(
            path = %path.display(),
            namespaces = store.namespaces().count(),
            "Configuration document loaded"
        );
        Ok(store)
    }

    /// Parse a document held in memory (e.g. an embedded asset).
    pub fn from_json_str(content: &str) -> Result<Self, ConfigLoadError> {
        let value: Value = serde_json::from_str(content)?;
        match value {
            Value::Object(document) => Ok(Self::from_document(document)),
            other => Err(ConfigLoadError::NotAnObject(type_name(&other))),
        }
    }

    pub fn from_document(document: ConfigurationDocument) -> Self {
        Self {
            document: Some(document),
            load_error: None,
        }
    }

    /// Sub-configuration for `namespace`, if present and an object.
    pub fn get_config_set(&self, namespace: &str) -> Option<&Map<String, Value>> {
        self.document.as_ref()?.get(namespace)?.as_object()
    }

    /// Top-level keys in document order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.document
            .iter()
            .flat_map(|document| document.keys().map(String::as_str))
    }

    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.document
            .as_ref()
            .is_some_and(|document| document.contains_key(namespace))
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn load_error(&self) -> Option<&ConfigLoadError> {
        self.load_error.as_ref()
    }

    /// Locally configured version of a service.
    ///
    /// Falls back to [`DEFAULT_CONFIG_VERSION`] when the namespace has no
    /// integer `version` field.
    pub fn service_version(&self, namespace: &str) -> i64 {
        self.get_config_set(namespace)
            .and_then(|set| json_i64(set, "version"))
            .unwrap_or(DEFAULT_CONFIG_VERSION)
    }

    /// Object store holding compatibility metadata, if the identity
    /// namespace names one.
    pub fn object_store_endpoint(&self) -> Option<ObjectStoreEndpoint> {
        let identity = self.get_config_set(IDENTITY_NAMESPACE)?;
        let compatibility = json_object(identity, COMPATIBILITY_KEY)?;
        Some(ObjectStoreEndpoint {
            region: json_str(compatibility, "region")?.to_string(),
            bucket: json_str(compatibility, "bucket")?.to_string(),
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
