//! Bounded concurrency pool.
//!
//! # Responsibilities
//! - Admit at most `capacity` tasks at once
//! - Queue excess tasks and admit them in submission order
//! - Release the slot whether the task returns, fails or panics
//!
//! # Design Decisions
//! - Admission goes through a fair `tokio::sync::Semaphore`; its internal lock
//!   is the only place admission decisions are made
//! - The pool never inspects the task's output
//! - Closing the pool cancels queued waiters with `PoolError::Closed`

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;

/// Errors raised by the pool itself (never by the submitted task).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("pool capacity must be at least 1")]
    ZeroCapacity,

    #[error("pool closed before the task was admitted")]
    Closed,
}

/// Limits how many submitted tasks run concurrently.
#[derive(Debug)]
pub struct ConcurrencyPool {
    permits: Arc<Semaphore>,
    capacity: usize,
    active: AtomicUsize,
    waiting: AtomicUsize,
    peak_active: AtomicUsize,
}

impl ConcurrencyPool {
    /// Create a pool admitting up to `capacity` tasks at once.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }
        Ok(Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            active: AtomicUsize::new(0),
            waiting: AtomicUsize::new(0),
            peak_active: AtomicUsize::new(0),
        })
    }

    /// Run `task` once a slot is free and return its output unchanged.
    ///
    /// Tasks that cannot be admitted immediately wait in FIFO order.
    pub async fn submit<F, T>(&self, task: F) -> Result<T, PoolError>
    where
        F: Future<Output = T>,
    {
        let permit = {
            let _queued = Counted::enter(&self.waiting);
            self.permits.acquire().await.map_err(|_| PoolError::Closed)?
        };

        let slot = ActiveSlot::enter(self);
        let output = task.await;
        drop(slot);
        drop(permit);
        Ok(output)
    }

    /// Stop admitting work. Queued submissions resolve to `PoolError::Closed`;
    /// tasks already running are unaffected.
    pub fn close(&self) {
        if !self.permits.is_closed() {
            tracing::warn!(
                active = self.active(),
                waiting = self.waiting(),
                "Concurrency pool closed, cancelling queued tasks"
            );
        }
        self.permits.close();
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tasks currently running.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Number of submissions waiting for a slot.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously running tasks seen so far.
    pub fn peak_active(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }
}

/// Increments a counter for as long as it lives.
struct Counted<'a>(&'a AtomicUsize);

impl<'a> Counted<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Counted<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// RAII guard for the active count; dropped on completion, error or panic.
struct ActiveSlot<'a> {
    pool: &'a ConcurrencyPool,
}

impl<'a> ActiveSlot<'a> {
    fn enter(pool: &'a ConcurrencyPool) -> Self {
        let now = pool.active.fetch_add(1, Ordering::SeqCst) + 1;
        pool.peak_active.fetch_max(now, Ordering::SeqCst);
        Self { pool }
    }
}

impl Drop for ActiveSlot<'_> {
    fn drop(&mut self) {
        self.pool.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    async fn wait_for_waiting(pool: &ConcurrencyPool, expected: usize) {
        while pool.waiting() != expected {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ConcurrencyPool::new(0).unwrap_err(), PoolError::ZeroCapacity);
    }

    #[tokio::test]
    async fn test_never_exceeds_capacity() {
        let pool = Arc::new(ConcurrencyPool::new(3).unwrap());
        let over_limit = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..12u64 {
            let pool = pool.clone();
            let over_limit = over_limit.clone();
            handles.push(tokio::spawn(async move {
                let inner = pool.clone();
                pool.submit(async move {
                    if inner.active() > inner.capacity() {
                        over_limit.fetch_add(1, Ordering::SeqCst);
                    }
                    tokio::time::sleep(Duration::from_millis(5 + i % 3)).await;
                    i
                })
                .await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }
        results.sort();

        assert_eq!(results, (0..12).collect::<Vec<_>>());
        assert_eq!(over_limit.load(Ordering::SeqCst), 0);
        assert!(pool.peak_active() <= 3);
        assert_eq!(pool.active(), 0);
    }

    #[tokio::test]
    async fn test_queued_tasks_admitted_in_submission_order() {
        let pool = Arc::new(ConcurrencyPool::new(1).unwrap());
        let gate = Arc::new(Notify::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let blocker = {
            let pool = pool.clone();
            let gate = gate.clone();
            tokio::spawn(async move { pool.submit(async move { gate.notified().await }).await })
        };
        while pool.active() != 1 {
            tokio::task::yield_now().await;
        }

        let mut handles = Vec::new();
        for i in 0..5 {
            let pool_clone = pool.clone();
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                pool_clone
                    .submit(async move { order.lock().unwrap().push(i) })
                    .await
            }));
            wait_for_waiting(&pool, i + 1).await;
        }

        gate.notify_one();
        blocker.await.unwrap().unwrap();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_task_errors_pass_through() {
        let pool = ConcurrencyPool::new(1).unwrap();
        let out: Result<Result<(), String>, PoolError> =
            pool.submit(async { Err("boom".to_string()) }).await;
        assert_eq!(out, Ok(Err("boom".to_string())));
        assert_eq!(pool.active(), 0);

        // The slot was released, so the next task still runs.
        assert_eq!(pool.submit(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_panicking_task_releases_slot() {
        let pool = Arc::new(ConcurrencyPool::new(1).unwrap());
        let p = pool.clone();
        let joined = tokio::spawn(async move {
            p.submit(async { panic!("task failed") }).await
        })
        .await;
        assert!(joined.is_err());
        assert_eq!(pool.active(), 0);
        assert_eq!(pool.submit(async { "after" }).await, Ok("after"));
    }

    #[tokio::test]
    async fn test_close_cancels_waiters() {
        let pool = Arc::new(ConcurrencyPool::new(1).unwrap());
        let gate = Arc::new(Notify::new());

        let running = {
            let pool = pool.clone();
            let gate = gate.clone();
            tokio::spawn(async move {
                pool.submit(async move {
                    gate.notified().await;
                    "done"
                })
                .await
            })
        };
        while pool.active() != 1 {
            tokio::task::yield_now().await;
        }

        let queued = {
            let pool_clone = pool.clone();
            tokio::spawn(async move { pool_clone.submit(async { "never" }).await })
        };
        wait_for_waiting(&pool, 1).await;

        pool.close();
        assert_eq!(queued.await.unwrap(), Err(PoolError::Closed));

        gate.notify_one();
        assert_eq!(running.await.unwrap(), Ok("done"));
        assert_eq!(pool.waiting(), 0);
    }
}
