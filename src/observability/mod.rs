//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store load, validation runs, object store calls:
//!     → logging.rs (structured tracing events, run_id span per validation)
//!     → metrics.rs (counters, histograms via the `metrics` facade)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
