//! Retry logic.
//!
//! # Responsibilities
//! - Replay a fallible async operation until it succeeds or attempts run out
//! - Sleep between attempts (fixed delay by default)
//! - Hand the last failure back to the caller unchanged
//!
//! # Design Decisions
//! - `max_attempts` counts the first call; zero is rejected at construction
//! - No state survives between `run` calls, so one policy serves every task
//! - Every error is retryable here; callers decide what counts as failure

use std::future::Future;
use std::time::Duration;

use crate::config::schema::{BackoffKind, RetryConfig};
use crate::resilience::backoff::calculate_backoff;

/// Errors building a retry policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetryError {
    #[error("retry attempts must be at least 1")]
    ZeroAttempts,
}

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryBackoff {
    Fixed,
    Exponential { max_delay: Duration },
}

/// Bounded retry with delay between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    backoff: RetryBackoff,
}

impl RetryPolicy {
    /// Fixed-delay policy.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, RetryError> {
        if max_attempts == 0 {
            return Err(RetryError::ZeroAttempts);
        }
        Ok(Self {
            max_attempts,
            delay,
            backoff: RetryBackoff::Fixed,
        })
    }

    pub fn from_config(config: &RetryConfig) -> Result<Self, RetryError> {
        let policy = Self::new(config.max_attempts, Duration::from_millis(config.delay_ms))?;
        Ok(match config.backoff {
            BackoffKind::Fixed => policy,
            BackoffKind::Exponential => policy.with_backoff(RetryBackoff::Exponential {
                max_delay: Duration::from_millis(config.max_delay_ms),
            }),
        })
    }

    pub fn with_backoff(mut self, backoff: RetryBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay slept after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            RetryBackoff::Fixed => self.delay,
            RetryBackoff::Exponential { max_delay } => {
                calculate_backoff(attempt, self.delay, max_delay)
            }
        }
    }

    /// Call `op` until it succeeds or `max_attempts` calls have failed.
    ///
    /// `op` receives the 1-based attempt number. After the final failed
    /// attempt its error is returned as is.
    pub async fn run<F, Fut, T, E>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    tracing::debug!(attempts = attempt, error = %e, "Retries exhausted");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    tracing::info!(attempt, delay = ?delay, error = %e, "Attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
