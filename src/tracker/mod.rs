//! Issue tracker collaborators.
//!
//! # Data Flow
//! ```text
//! Start of run:
//!     RecordSource::fetch_open_records(exclude labels)
//!     → TrackerRecord list (body + labels)
//!     → types.rs extract_url → CheckTarget
//!
//! Per record, after reconciliation:
//!     LabelSink::set_labels(id, labels)
//!         - github.rs: PUT issue labels
//!         - dry_run.rs: log only
//! ```
//!
//! # Design Decisions
//! - The audit only sees the traits; GitHub details stay in github.rs
//! - Sinks swallow and log their own failures

pub mod dry_run;
pub mod github;
pub mod types;

pub use dry_run::DryRunSink;
pub use github::GithubTracker;
pub use types::{extract_url, LabelSink, RecordSource, TrackerError, TrackerRecord};
