//! Crawl workers
//!
//! Each worker repeatedly claims an address from the shared frontier, fetches
//! it, writes the page's artifacts, extracts same-host links and hands them
//! back to the frontier. Per-page problems are logged and counted; they never
//! stop the worker.

use crate::config::TerminationPolicy;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::frontier::{Claim, CrawlStats, Frontier, PageOutcome};
use crate::extract::{extract_links, extract_text};
use crate::state::WorkerState;
use crate::storage::{ArtifactStore, PageArtifact};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Progress is logged for the first few pages and then every this many
const PROGRESS_INTERVAL: u64 = 10;

/// Everything a worker shares with the rest of the pool
#[derive(Clone)]
pub struct WorkerContext {
    pub frontier: Arc<Frontier>,
    pub fetcher: Fetcher,
    pub store: Arc<dyn ArtifactStore>,
    pub target_host: String,
    pub idle_wait: Duration,
    pub termination: TerminationPolicy,
}

/// One member of the worker pool
pub struct Worker {
    id: usize,
    state: WorkerState,
    ctx: WorkerContext,
}

impl Worker {
    pub fn new(id: usize, ctx: WorkerContext) -> Self {
        Self {
            id,
            state: WorkerState::Idle,
            ctx,
        }
    }

    fn transition(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "worker {}: {} -> {}",
            self.id,
            self.state,
            next
        );
        tracing::trace!("worker {}: {} -> {}", self.id, self.state, next);
        self.state = next;
    }

    /// Runs until the frontier says this idle worker may exit
    pub async fn run(mut self) -> WorkerState {
        tracing::debug!("worker {} started", self.id);

        loop {
            let claim = match self.ctx.frontier.dequeue(self.ctx.idle_wait).await {
                Some(claim) => claim,
                None => {
                    if self.ctx.frontier.may_exit(self.ctx.termination) {
                        break;
                    }
                    continue;
                }
            };

            self.handle(claim).await;
        }

        self.transition(WorkerState::Stopped);
        tracing::debug!("worker {} stopped", self.id);
        self.state
    }

    /// Processes one claimed address from fetch to completion
    async fn handle(&mut self, claim: Claim) {
        let address = claim.address().to_string();

        self.transition(WorkerState::Fetching);
        let body = match self.ctx.fetcher.fetch(&address).await {
            Ok(FetchResult::Html { body, .. }) => body,
            Ok(FetchResult::NonHtml { content_type, .. }) => {
                tracing::debug!("Skipping non-HTML {} ({})", address, content_type);
                let completion = claim.complete(PageOutcome::NonHtml, std::iter::empty());
                self.transition(WorkerState::Idle);
                log_progress(&completion.stats);
                return;
            }
            Err(e) => {
                tracing::warn!("Error crawling {}: {}", address, e);
                claim.complete(PageOutcome::Failed, std::iter::empty());
                self.transition(WorkerState::Idle);
                return;
            }
        };

        self.transition(WorkerState::Persisting);
        let artifact = PageArtifact {
            text: extract_text(&body),
            markup: body,
            address: address.clone(),
        };
        let paths = match self.ctx.store.persist(&artifact) {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!("Error saving {}: {}", address, e);
                claim.complete(PageOutcome::Failed, std::iter::empty());
                self.transition(WorkerState::Idle);
                return;
            }
        };

        self.transition(WorkerState::Extracting);
        let links = page_links(&address, &artifact.markup, &self.ctx.target_host);

        self.transition(WorkerState::Enqueuing);
        let completion = claim.complete(PageOutcome::Stored, links);
        tracing::info!("Processed: {} -> {}", address, paths.text.display());
        if completion.admitted > 0 {
            tracing::debug!("{} new links from {}", completion.admitted, address);
        }
        log_progress(&completion.stats);

        self.transition(WorkerState::Idle);
    }
}

/// Extracts in-scope links, resolving against the page's own address
fn page_links(address: &str, markup: &str, target_host: &str) -> BTreeSet<String> {
    match Url::parse(address) {
        Ok(page) => extract_links(&page, markup, target_host),
        Err(e) => {
            tracing::debug!("Cannot resolve links on {}: {}", address, e);
            BTreeSet::new()
        }
    }
}

fn log_progress(stats: &CrawlStats) {
    if stats.processed < PROGRESS_INTERVAL || stats.processed % PROGRESS_INTERVAL == 0 {
        tracing::info!(
            "Processed: {} | Queue: {} | Failed: {}",
            stats.processed,
            stats.queued,
            stats.failed
        );
    }
}

/// Spawns `workers` tasks sharing `ctx` and waits for all of them
///
/// A task that panics is logged; its claimed address, if any, has already
/// been counted as failed when the claim was dropped.
pub async fn run_pool(ctx: WorkerContext, workers: usize) {
    let handles: Vec<JoinHandle<WorkerState>> = (0..workers)
        .map(|id| tokio::spawn(Worker::new(id, ctx.clone()).run()))
        .collect();

    for (id, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(state) if !state.is_terminal() => {
                tracing::warn!("worker {} returned while {}", id, state);
            }
            Ok(_) => {}
            Err(e) => tracing::error!("worker {} ended abnormally: {}", id, e),
        }
    }
}
