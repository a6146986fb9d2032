//! SDK configuration store and service compatibility validator.

pub mod compat;
pub mod config;
pub mod document;
pub mod observability;
pub mod resilience;
pub mod store;

pub use compat::{CompatError, CompatibilityValidator, ServiceCompatibilityInfo, ValidationResult};
pub use config::Settings;
pub use document::{ConfigStore, ObjectStoreEndpoint};
pub use store::{ObjectStore, ObjectStoreProvider};
