//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier with its dedup set, counters and idle-exit check
//! - Politeness delays and User-Agent rotation
//! - HTTP fetching and response classification
//! - The worker pool and overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod politeness;
mod worker;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{
    build_http_client, is_html_content_type, FetchError, FetchResult, Fetcher, ACCEPT_LANGUAGE_VALUE,
    ACCEPT_VALUE,
};
pub use frontier::{Claim, Completion, CrawlStats, Frontier, PageOutcome};
pub use politeness::{Politeness, RandomSource, RequestPlan, SequenceSource, ThreadRandom};
pub use worker::{run_pool, Worker, WorkerContext};
