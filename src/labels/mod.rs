//! Label reconciliation subsystem.
//!
//! # Data Flow
//! ```text
//! (CheckResult, current labels, LabelConfig, CheckerMode)
//!     → reconcile.rs
//!     → next label list → LabelSink
//! ```
//!
//! # Design Decisions
//! - Pure function: no I/O, no panics, deterministic output order
//! - Only managed labels (status, version, unreachable, invalid) are touched
//! - Running it twice with the same result changes nothing

pub mod reconcile;

pub use reconcile::{is_version_label, LabelReconciler};
