//! Site checking subsystem.
//!
//! # Data Flow
//! ```text
//! CheckTarget
//!     → site.rs check_site (RetryPolicy around probe)
//!         → jitter.rs (pre-request delay, User-Agent)
//!         → HTTP GET, status classification
//!         → friend mode: valid = reachable
//!         → theme mode: theme.rs (metadata + version strategies)
//!     → CheckResult
//! ```
//!
//! # Design Decisions
//! - One probe = one HTTP attempt; retries happen around it, not inside it
//! - Reachability is allow-list membership of the status code
//! - Randomness is injected so tests stay deterministic

pub mod jitter;
pub mod site;
pub mod theme;
pub mod types;

pub use jitter::{FixedJitter, Jitter, ThreadJitter};
pub use site::{check_site, CheckerError, ContentCheck, HttpSiteChecker, SiteChecker};
pub use theme::{ThemeInfo, ThemeInspector};
pub use types::{AcceptedCodes, CheckResult, CheckTarget, ProbeError};
