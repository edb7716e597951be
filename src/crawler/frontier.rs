//! Shared crawl frontier and progress counters
//!
//! This module handles:
//! - The FIFO queue of addresses waiting to be fetched
//! - The set of every address ever admitted, so nothing is queued twice
//! - Processed/failed counters and the number of addresses in flight
//! - Blocking dequeue with a bounded wait, and the idle-exit check
//!
//! All of the above lives behind one mutex. It is held only while the queue
//! or counters change, never across a fetch or a file write.

use crate::config::TerminationPolicy;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Snapshot of crawl progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched successfully, including non-HTML pages
    pub processed: u64,

    /// Pages that could not be fetched or stored
    pub failed: u64,

    /// Processed pages that produced no artifact (non-HTML)
    pub skipped: u64,

    /// Addresses waiting in the queue
    pub queued: usize,

    /// Addresses handed to a worker and not yet finished
    pub in_flight: usize,

    /// Addresses ever admitted, seed included
    pub discovered: usize,
}

/// How the handling of one address ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// HTML page fetched and both artifacts written
    Stored,

    /// Fetched, but not HTML; nothing written
    NonHtml,

    /// Transport, status or storage failure
    Failed,
}

/// Result of finishing a claimed address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Links that were new and joined the queue
    pub admitted: usize,

    /// Progress right after the update
    pub stats: CrawlStats,
}

#[derive(Debug, Default)]
struct FrontierState {
    pending: VecDeque<String>,
    visited: HashSet<String>,
    processed: u64,
    failed: u64,
    skipped: u64,
    in_flight: usize,
}

impl FrontierState {
    /// Queues an address unless it was ever admitted before
    fn admit(&mut self, address: String) -> bool {
        if self.visited.contains(&address) {
            return false;
        }
        self.visited.insert(address.clone());
        self.pending.push_back(address);
        true
    }

    fn is_quiescent(&self) -> bool {
        self.pending.is_empty() && self.in_flight == 0
    }

    fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            processed: self.processed,
            failed: self.failed,
            skipped: self.skipped,
            queued: self.pending.len(),
            in_flight: self.in_flight,
            discovered: self.visited.len(),
        }
    }
}

/// Thread-safe crawl frontier
///
/// Shared between the coordinator and every worker through an `Arc`.
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    work_available: Notify,
}

impl Frontier {
    /// Creates a frontier holding exactly one address
    pub fn new(seed: impl Into<String>) -> Self {
        let mut state = FrontierState::default();
        state.admit(seed.into());

        Self {
            state: Mutex::new(state),
            work_available: Notify::new(),
        }
    }

    /// Locks the shared state
    ///
    /// No code panics while holding the lock, so a poisoned mutex still
    /// guards consistent data.
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admits addresses that were never seen before
    ///
    /// Each address joins the visited set and the queue in the same critical
    /// section, so concurrent callers can never queue it twice.
    ///
    /// # Returns
    ///
    /// The number of addresses newly queued
    pub fn admit<I>(&self, addresses: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let admitted = {
            let mut state = self.lock();
            addresses
                .into_iter()
                .filter(|address| state.admit(address.clone()))
                .count()
        };

        self.wake(admitted);
        admitted
    }

    /// Takes the next address without waiting
    pub fn try_dequeue(self: &Arc<Self>) -> Option<Claim> {
        let address = {
            let mut state = self.lock();
            let address = state.pending.pop_front()?;
            state.in_flight += 1;
            address
        };

        Some(Claim {
            frontier: Arc::clone(self),
            address,
            finished: false,
        })
    }

    /// Takes the next address, waiting up to `wait` for one to arrive
    ///
    /// Returns None when the wait runs out, or early once the crawl is
    /// quiescent (nothing queued and nothing in flight).
    pub async fn dequeue(self: &Arc<Self>, wait: Duration) -> Option<Claim> {
        let deadline = Instant::now() + wait;

        loop {
            // Registered before checking the queue so a concurrent admit
            // cannot slip between the check and the wait
            let notified = self.work_available.notified();

            if let Some(claim) = self.try_dequeue() {
                return Some(claim);
            }

            if self.lock().is_quiescent() {
                return None;
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return None;
            }
        }
    }

    /// Decides whether an idle worker may exit
    pub fn may_exit(&self, policy: TerminationPolicy) -> bool {
        let state = self.lock();
        match policy {
            TerminationPolicy::Quiescent => state.is_quiescent(),
            TerminationPolicy::PendingEmpty => state.pending.is_empty(),
        }
    }

    /// Current progress
    pub fn stats(&self) -> CrawlStats {
        self.lock().snapshot()
    }

    /// Returns true if the address was ever admitted
    pub fn contains(&self, address: &str) -> bool {
        self.lock().visited.contains(address)
    }

    /// Number of addresses waiting in the queue
    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Records the outcome of a claimed address and admits its links
    ///
    /// Links, counters and the in-flight count change in one critical
    /// section so progress reports always agree with the queue.
    fn finish<I>(&self, outcome: PageOutcome, links: I) -> Completion
    where
        I: IntoIterator<Item = String>,
    {
        let (admitted, stats, quiescent) = {
            let mut state = self.lock();

            let admitted = links
                .into_iter()
                .filter(|address| state.admit(address.clone()))
                .count();

            match outcome {
                PageOutcome::Stored => state.processed += 1,
                PageOutcome::NonHtml => {
                    state.processed += 1;
                    state.skipped += 1;
                }
                PageOutcome::Failed => state.failed += 1,
            }
            state.in_flight = state.in_flight.saturating_sub(1);

            (admitted, state.snapshot(), state.is_quiescent())
        };

        self.wake(admitted);
        if quiescent {
            // Let idle workers notice the end of the crawl right away
            self.work_available.notify_waiters();
        }

        Completion { admitted, stats }
    }

    fn wake(&self, admitted: usize) {
        for _ in 0..admitted {
            self.work_available.notify_one();
        }
    }
}

/// An address handed to one worker
///
/// The claim must be finished with [`Claim::complete`]. A claim dropped
/// without completing (for example when the worker's task panics) counts the
/// address as failed, so the in-flight count can always reach zero.
#[derive(Debug)]
pub struct Claim {
    frontier: Arc<Frontier>,
    address: String,
    finished: bool,
}

impl Claim {
    /// The claimed address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Records the outcome and admits the page's links
    pub fn complete<I>(mut self, outcome: PageOutcome, links: I) -> Completion
    where
        I: IntoIterator<Item = String>,
    {
        self.finished = true;
        self.frontier.finish(outcome, links)
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("Abandoned {} before completion, counting it as failed", self.address);
            self.frontier.finish(PageOutcome::Failed, std::iter::empty());
        }
    }
}
