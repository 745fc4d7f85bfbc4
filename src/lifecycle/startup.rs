//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build pool, retry policy, checker and reconciler in dependency order
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The label sink is passed in so dry runs and tests can swap it

use std::sync::Arc;

use crate::audit::Auditor;
use crate::checker::{CheckerError, HttpSiteChecker, Jitter};
use crate::config::{validated, AuditConfig, ConfigError};
use crate::labels::LabelReconciler;
use crate::pool::{ConcurrencyPool, PoolError};
use crate::resilience::{RetryError, RetryPolicy};
use crate::tracker::LabelSink;

/// Fatal errors before the first site is checked.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("retry error: {0}")]
    Retry(#[from] RetryError),

    #[error("checker error: {0}")]
    Checker(#[from] CheckerError),
}

/// Build an [`Auditor`] from a configuration.
pub fn build_auditor(
    config: AuditConfig,
    jitter: Box<dyn Jitter>,
    sink: Arc<dyn LabelSink>,
) -> Result<Auditor, StartupError> {
    let config = validated(config)?;

    let pool = Arc::new(ConcurrencyPool::new(config.pool.capacity)?);
    let retry = RetryPolicy::from_config(&config.retry)?;
    let checker = HttpSiteChecker::new(
        config.checker.mode,
        &config.request,
        &config.theme,
        jitter,
    )?;
    let reconciler = LabelReconciler::new(config.labels.clone(), config.checker.mode);

    tracing::info!(
        checker = %config.checker.mode,
        capacity = config.pool.capacity,
        attempts = config.retry.max_attempts,
        accepted_codes = %config.request.accepted_codes,
        "Auditor ready"
    );

    Ok(Auditor::new(pool, Arc::new(checker), retry, reconciler, sink))
}
