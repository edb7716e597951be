//! Shoal main entry point
//!
//! This is the command-line interface for the Shoal single-host crawler.

use anyhow::Context;
use clap::Parser;
use shoal::config::{load_config_with_hash, validate, Config};
use shoal::crawler::run_crawl;
use shoal::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shoal: a polite single-host web crawler
///
/// Shoal crawls every HTML page reachable from START_URL without leaving its
/// host, saving the raw markup and the visible text of each page.
#[derive(Parser, Debug)]
#[command(name = "shoal")]
#[command(version)]
#[command(about = "A polite single-host web crawler and text extractor", long_about = None)]
struct Cli {
    /// Address to start crawling from
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Directory to store crawled data [default: ./crawled_data]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Number of worker threads [default: 5]
    #[arg(short, long, value_name = "N")]
    threads: Option<usize>,

    /// Base delay between requests in seconds [default: 1.0]
    #[arg(short, long, value_name = "SECS")]
    delay: Option<f64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of a loaded configuration
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.output.root = dir.clone();
        }
        if let Some(threads) = self.threads {
            config.crawler.workers = threads;
        }
        if let Some(delay) = self.delay {
            config.crawler.base_delay = delay;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply(&mut config);
    validate(&config).context("Invalid settings")?;

    let report = run_crawl(&cli.start_url, config)
        .await
        .with_context(|| format!("Crawl of {} failed", cli.start_url))?;

    print_report(&report);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shoal=info,warn"),
            1 => EnvFilter::new("shoal=debug,info"),
            2 => EnvFilter::new("shoal=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
