//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → INPUT_* workflow inputs (loader.rs)
//!     → CLI flags (main.rs)
//!     → validation.rs (semantic checks)
//!     → AuditConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the run starts
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Any config error is fatal before the first site is checked

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, validated, ConfigError};
pub use schema::AuditConfig;
pub use schema::CheckerMode;
pub use schema::{
    LabelConfig, LoggingConfig, PoolConfig, RequestConfig, RetryConfig, ThemeConfig, TrackerConfig,
};
