//! Request shaping: randomized pre-request delay and User-Agent rotation.
//!
//! Both only reduce the chance of tripping anti-scraping filters. They are not
//! rate limiting and give no compliance guarantee.

use std::time::Duration;

use rand::Rng;

/// Source of the random choices made before each request.
pub trait Jitter: Send + Sync + std::fmt::Debug {
    /// Pick a value in `[low, high)`. Returns `low` when the window is empty.
    fn pick_in_range(&self, low: u64, high: u64) -> u64;

    /// Pick an index in `[0, len)`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// Thread-local RNG backed jitter.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadJitter;

impl Jitter for ThreadJitter {
    fn pick_in_range(&self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        rand::thread_rng().gen_range(low..high)
    }

    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic jitter: always the lower bound and the first entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedJitter;

impl Jitter for FixedJitter {
    fn pick_in_range(&self, low: u64, _high: u64) -> u64 {
        low
    }

    fn pick_index(&self, _len: usize) -> usize {
        0
    }
}

/// Delay window and User-Agent pool, sampled through a [`Jitter`] source.
#[derive(Debug)]
pub struct RequestShaper {
    delay_min_ms: u64,
    delay_max_ms: u64,
    user_agents: Vec<String>,
    jitter: Box<dyn Jitter>,
}

impl RequestShaper {
    pub fn new(
        delay_min_ms: u64,
        delay_max_ms: u64,
        user_agents: Vec<String>,
        jitter: Box<dyn Jitter>,
    ) -> Self {
        let user_agents = user_agents
            .into_iter()
            .filter(|ua| !ua.trim().is_empty())
            .collect();
        Self {
            delay_min_ms,
            delay_max_ms,
            user_agents,
            jitter,
        }
    }

    pub fn next_delay(&self) -> Duration {
        Duration::from_millis(self.jitter.pick_in_range(self.delay_min_ms, self.delay_max_ms))
    }

    pub fn next_user_agent(&self) -> Option<&str> {
        if self.user_agents.is_empty() {
            return None;
        }
        let index = self.jitter.pick_index(self.user_agents.len());
        self.user_agents.get(index).map(String::as_str)
    }
}
