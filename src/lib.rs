//! Shoal: a polite, single-host web crawler and text extractor
//!
//! This crate crawls every HTML page reachable from a seed address without
//! leaving its network host, saving each page's raw markup alongside the
//! visible text extracted from it.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Shoal operations
#[derive(Debug, Error)]
pub enum ShoalError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Shoal operations
pub type Result<T> = std::result::Result<T, ShoalError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator};
pub use extract::{extract_links, extract_text};
pub use output::CrawlReport;
pub use state::WorkerState;
pub use crate::url::{derive_filename, is_in_scope};
