//! Service version compatibility checks.
//!
//! # Data Flow
//! ```text
//! ConfigStore (local versions, metadata bucket)
//!     → validator.rs (list bucket, fetch metadata for local namespaces)
//!     → remote.rs (parse one metadata object per service)
//!     → types.rs (decision rule → ValidationResult)
//! ```
//!
//! # Decision Rule
//! - `version < minVersion` → incompatible
//! - `version <= deprecated` → deprecated
//!
//! Both checks are independent; a missing bound never triggers.

pub mod remote;
pub mod types;
pub mod validator;

pub use types::{CompatError, CompatResult, ServiceCompatibilityInfo, ValidationResult};
pub use validator::{CompatibilityValidator, ValidatorSettings};
