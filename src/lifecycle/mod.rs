//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build pool, checker, tracker → Fetch records → Run
//!
//! Signals (signals.rs):
//!     SIGINT → close pool → queued units cancelled, running units drain
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal before the first request
//! - No forced abort of in-flight checks; the HTTP timeout bounds them

pub mod signals;
pub mod startup;

pub use signals::close_pool_on_ctrl_c;
pub use startup::{build_auditor, StartupError};
