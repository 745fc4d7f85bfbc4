//! Concurrency control subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator submits one unit per record
//!     → limiter.rs (admit if active < capacity, else queue FIFO)
//!     → unit runs (delay, HTTP fetch, label update)
//!     → slot released → next queued unit admitted
//! ```
//!
//! # Design Decisions
//! - The pool is the only shared mutable state of a run
//! - Counters are private; callers observe them through accessors
//! - No priorities: admission order equals submission order

pub mod limiter;

pub use limiter::{ConcurrencyPool, PoolError};
