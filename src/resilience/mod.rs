//! Resilience for object store calls.
//!
//! # Data Flow
//! ```text
//! list / fetch call
//!     → retry.rs (per-attempt deadline via tokio::time::timeout)
//!     → on transient failure: backoff.rs (exponential delay + jitter), try again
//!     → last error surfaces to the caller
//! ```
//!
//! # Design Decisions
//! - Every remote call has a deadline
//! - Missing objects are not retried; transport errors and timeouts are

pub mod backoff;
pub mod retry;

pub use backoff::calculate_backoff;
pub use retry::{with_retry, CallError, RetryPolicy};
