//! OS signal handling.
//!
//! # Responsibilities
//! - Watch for Ctrl+C during a run
//! - Close the concurrency pool so queued units are cancelled
//!
//! # Design Decisions
//! - Units already running finish; their labels are still written
//! - Cancelled units are reported as failures, so the run exits non-zero

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::pool::ConcurrencyPool;

/// Spawn a task that closes `pool` on Ctrl+C. Abort the handle once the run is over.
pub fn close_pool_on_ctrl_c(pool: Arc<ConcurrencyPool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Shutdown signal received, cancelling queued checks");
                pool.close();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            }
        }
    })
}
