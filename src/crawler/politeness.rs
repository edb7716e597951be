//! Request pacing and identity rotation
//!
//! Every request waits `base_delay × (0.5 + r)` with `r` drawn from `[0, 1)`
//! and carries a User-Agent picked uniformly from a fixed pool. Both draws
//! come from a [`RandomSource`], so tests can replay exact sequences.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Source of the random draws behind delay jitter and identity rotation
pub trait RandomSource: Send {
    /// Returns a value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Returns an index in `0..len`; `len` is at least 1
    fn pick(&mut self, len: usize) -> usize;
}

/// Production source backed by an OS-seeded `StdRng`
#[derive(Debug)]
pub struct ThreadRandom {
    rng: StdRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible source for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Deterministic source that cycles through fixed values
///
/// Values are clamped into `[0, 1)`. `pick` scales the next value onto the
/// index range, so `0.0` picks the first entry and values near `1.0` the last.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Source that always draws the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;

        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0 - f64::EPSILON)
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        let index = (self.next_unit() * len as f64) as usize;
        index.min(len.saturating_sub(1))
    }
}

/// What the next request should look like
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    /// Time to wait before sending
    pub delay: Duration,

    /// User-Agent header value
    pub user_agent: String,
}

/// Paces requests and rotates the identity they present
///
/// Shared by all workers; the random source sits behind its own short-lived
/// lock.
pub struct Politeness {
    base_delay: Duration,
    user_agents: Vec<String>,
    random: Mutex<Box<dyn RandomSource>>,
}

impl Politeness {
    /// Creates a politeness policy
    ///
    /// An empty `user_agents` pool falls back to the built-in browser
    /// identities.
    pub fn new(
        base_delay: Duration,
        user_agents: Vec<String>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        let user_agents = if user_agents.is_empty() {
            crate::config::DEFAULT_USER_AGENTS
                .iter()
                .map(|ua| ua.to_string())
                .collect()
        } else {
            user_agents
        };

        Self {
            base_delay,
            user_agents,
            random: Mutex::new(random),
        }
    }

    /// Draws the delay and identity for the next request
    pub fn next_plan(&self) -> RequestPlan {
        let mut random = self.random.lock().unwrap_or_else(PoisonError::into_inner);

        let factor = 0.5 + random.next_unit();
        // Saturates instead of overflowing for very large bases
        let delay = Duration::try_from_secs_f64(self.base_delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX);
        let index = random.pick(self.user_agents.len());

        RequestPlan {
            delay,
            user_agent: self.user_agents[index].clone(),
        }
    }

    /// The identities requests rotate through
    pub fn user_agents(&self) -> &[String] {
        &self.user_agents
    }
}

impl std::fmt::Debug for Politeness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Politeness")
            .field("base_delay", &self.base_delay)
            .field("user_agents", &self.user_agents.len())
            .finish_non_exhaustive()
    }
}
