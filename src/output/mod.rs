//! Output module for crawl summaries
//!
//! This module handles the final report of a crawl: its counters, where the
//! artifacts went, and the summary printed on completion.

mod report;

pub use report::{print_report, render_report, CrawlReport};
