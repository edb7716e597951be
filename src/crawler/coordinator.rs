//! Crawler coordinator - main crawl orchestration logic
//!
//! This module wires the crawl together:
//! - Validating the seed and deriving the target host
//! - Creating the output directories
//! - Seeding the frontier and building the shared fetcher
//! - Running the worker pool to completion and reporting the result

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::politeness::{Politeness, RandomSource, ThreadRandom};
use crate::crawler::worker::{run_pool, WorkerContext};
use crate::output::CrawlReport;
use crate::storage::{open_store, ArtifactStore};
use crate::url::{parse_seed, target_host, ArtifactKind};
use crate::ShoalError;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    seed: Url,
    target_host: String,
    frontier: Arc<Frontier>,
    store: Arc<dyn ArtifactStore>,
    random: Box<dyn RandomSource>,
}

impl Coordinator {
    /// Creates a coordinator that writes to the filesystem
    ///
    /// The seed is validated before anything touches the disk.
    ///
    /// # Arguments
    ///
    /// * `seed` - Absolute address the crawl starts from
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ShoalError)` - Invalid seed or configuration, or the output
    ///   directories could not be created
    pub fn new(seed: &str, config: Config) -> Result<Self, ShoalError> {
        let seed = parse_seed(seed)?;
        validate(&config)?;
        let store = open_store(&config.output.root)?;

        Self::from_parts(seed, config, Arc::new(store), Box::new(ThreadRandom::new()))
    }

    /// Creates a coordinator from explicit collaborators
    ///
    /// # Arguments
    ///
    /// * `seed` - Parsed seed address
    /// * `config` - The crawler configuration
    /// * `store` - Where artifacts are written
    /// * `random` - Source of delay jitter and User-Agent picks
    pub fn from_parts(
        seed: Url,
        config: Config,
        store: Arc<dyn ArtifactStore>,
        random: Box<dyn RandomSource>,
    ) -> Result<Self, ShoalError> {
        validate(&config)?;
        let target_host = target_host(&seed)?;
        let frontier = Arc::new(Frontier::new(seed.as_str()));

        Ok(Self {
            config,
            seed,
            target_host,
            frontier,
            store,
            random,
        })
    }

    /// The host every crawled address must share
    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    /// The shared frontier
    pub fn frontier(&self) -> &Arc<Frontier> {
        &self.frontier
    }

    /// Runs the worker pool until the crawl ends
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Final counters and output locations
    /// * `Err(ShoalError)` - The base delay is unusable or the HTTP client
    ///   could not be built
    pub async fn run(self) -> Result<CrawlReport, ShoalError> {
        let crawler = &self.config.crawler;

        tracing::info!("Starting crawl from: {}", self.seed);
        tracing::info!("Target domain: {}", self.target_host);
        tracing::info!(
            "Output directory: {}",
            self.config.output.root.display()
        );
        tracing::info!("Using {} worker threads", crawler.workers);
        tracing::info!("Base delay: {}s", crawler.base_delay);

        let politeness = Politeness::new(
            crawler.politeness_delay()?,
            self.config.user_agent.pool.clone(),
            self.random,
        );
        tracing::debug!("Rotating {} user agents", politeness.user_agents().len());
        let client = build_http_client(crawler.timeout())?;

        let ctx = WorkerContext {
            frontier: Arc::clone(&self.frontier),
            fetcher: Fetcher::new(client, Arc::new(politeness)),
            store: Arc::clone(&self.store),
            target_host: self.target_host.clone(),
            idle_wait: crawler.idle_wait(),
            termination: crawler.termination,
        };

        let start = Instant::now();
        run_pool(ctx, crawler.workers).await;

        let stats = self.frontier.stats();
        if stats.queued > 0 {
            tracing::warn!("{} addresses left unvisited", stats.queued);
        }

        Ok(CrawlReport {
            processed: stats.processed,
            failed: stats.failed,
            skipped: stats.skipped,
            discovered: stats.discovered,
            html_dir: self.store.location(ArtifactKind::Html).to_path_buf(),
            text_dir: self.store.location(ArtifactKind::Text).to_path_buf(),
            elapsed: start.elapsed(),
        })
    }
}

/// Crawls everything reachable from `seed` on its host
///
/// # Arguments
///
/// * `seed` - Absolute address the crawl starts from
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished
/// * `Err(ShoalError)` - Crawl could not start
pub async fn run_crawl(seed: &str, config: Config) -> Result<CrawlReport, ShoalError> {
    Coordinator::new(seed, config)?.run().await
}
