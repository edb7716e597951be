//! End-of-crawl report
//!
//! This module provides the final counters of a crawl and the summary
//! printed when it completes.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

/// Final result of a crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// Pages fetched successfully, non-HTML included
    pub processed: u64,

    /// Pages that failed to fetch or store
    pub failed: u64,

    /// Processed pages that produced no artifact
    pub skipped: u64,

    /// Distinct addresses admitted, seed included
    pub discovered: usize,

    /// Directory holding raw markup
    pub html_dir: PathBuf,

    /// Directory holding extracted text
    pub text_dir: PathBuf,

    /// Wall-clock duration of the worker pool
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Pages that were attempted, whatever the outcome
    pub fn attempted(&self) -> u64 {
        self.processed + self.failed
    }

    /// Pages that produced both artifacts
    pub fn stored(&self) -> u64 {
        self.processed.saturating_sub(self.skipped)
    }

    /// Percentage of attempted pages that were processed
    pub fn success_rate(&self) -> f64 {
        let attempted = self.attempted();
        if attempted == 0 {
            0.0
        } else {
            (self.processed as f64 / attempted as f64) * 100.0
        }
    }

    /// Processed pages per second
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Formats the completion summary
pub fn render_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "\nCrawling completed!");
    let _ = writeln!(out, "Total pages processed: {}", report.processed);
    let _ = writeln!(out, "Pages saved: {}", report.stored());
    let _ = writeln!(out, "Failed requests: {}", report.failed);
    if report.skipped > 0 {
        let _ = writeln!(out, "Skipped (not HTML): {}", report.skipped);
    }
    let _ = writeln!(
        out,
        "Success rate: {:.1}% ({:.2} pages/sec over {:.1}s)",
        report.success_rate(),
        report.rate(),
        report.elapsed.as_secs_f64()
    );
    let _ = writeln!(out, "HTML saved to: {}", report.html_dir.display());
    let _ = writeln!(out, "Extracted text saved to: {}", report.text_dir.display());

    out
}

/// Prints the completion summary to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", render_report(report));
}
