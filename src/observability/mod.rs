//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (issue, url, status, attempt)
//!     → logging.rs subscriber (pretty or JSON to stdout)
//! ```
//!
//! # Design Decisions
//! - Every log line about a record carries its issue number
//! - Log level configurable via config and `RUST_LOG`

pub mod logging;

pub use logging::init_logging;
