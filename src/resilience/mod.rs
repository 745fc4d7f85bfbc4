//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! One site check:
//!     → retries.rs (run probe, on failure sleep and replay)
//!     → backoff.rs (delay between attempts when exponential backoff is configured)
//!     → last failure handed back to the checker, which downgrades it to "unreachable"
//! ```
//!
//! # Design Decisions
//! - Timeouts live on the HTTP client; a timed-out probe is one failed attempt
//! - Fixed delay is the default, backoff is opt-in
//! - No retry budget: the target list is bounded and short-lived

pub mod backoff;
pub mod retries;

pub use retries::{RetryBackoff, RetryError, RetryPolicy};
