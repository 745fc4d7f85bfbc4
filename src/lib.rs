//! Concurrent site auditor.
//!
//! Checks every site listed in an issue tracker, classifies it as reachable
//! and valid, and reconciles the record's labels to match.
//!
//! # Data Flow
//! ```text
//! tracker ──records──▶ audit::Auditor ──submit──▶ pool::ConcurrencyPool
//!                                                   │
//!                         resilience::RetryPolicy ◀─┤
//!                         checker::SiteChecker   ◀──┘
//!                                │ CheckResult
//!                                ▼
//!                         labels::LabelReconciler ──labels──▶ tracker::LabelSink
//! ```

pub mod audit;
pub mod checker;
pub mod config;
pub mod labels;
pub mod lifecycle;
pub mod observability;
pub mod pool;
pub mod resilience;
pub mod tracker;

pub use audit::{AuditReport, Auditor};
pub use config::AuditConfig;
pub use pool::ConcurrencyPool;
