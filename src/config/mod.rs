//! Runtime settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → handed to ConfigStore / CompatibilityValidator at startup
//! ```
//!
//! These are the settings of the SDK runtime itself (where the asset lives,
//! object store deadlines, retries, logging). The bundled configuration
//! document that calling SDKs read lives in [`crate::document`].

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, parse_settings, SettingsError};
pub use schema::{
    DocumentConfig, LogFormat, ObjectStoreConfig, ObservabilityConfig, RetryConfig, Settings,
};
pub use validation::{validate_settings, SettingsValidationError};
