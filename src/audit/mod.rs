//! Audit run subsystem.
//!
//! # Data Flow
//! ```text
//! TrackerRecord list
//!     → orchestrator.rs (one unit per record, submitted to the pool)
//!         → checker (RetryPolicy around SiteChecker)
//!         → labels (LabelReconciler)
//!         → tracker (LabelSink)
//!     → report.rs (per-record outcomes, summary, optional JSON file)
//! ```
//!
//! # Design Decisions
//! - Failures are contained per record; only the failure count reaches the process exit code
//! - Skipped records (no URL) are not failures

pub mod orchestrator;
pub mod report;

pub use orchestrator::Auditor;
pub use report::{AuditReport, ReportError, TargetOutcome};
