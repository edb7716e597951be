use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Browser identities rotated across requests
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36",
];

/// Main configuration structure for Shoal
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Base politeness delay before each request (seconds)
    ///
    /// The actual delay is jittered between 0.5x and 1.5x this value.
    #[serde(rename = "base-delay")]
    pub base_delay: f64,

    /// Timeout for a single request (milliseconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// How long an idle worker waits for new work before checking for
    /// termination (milliseconds)
    #[serde(rename = "dequeue-wait")]
    pub dequeue_wait: u64,

    /// When idle workers are allowed to exit
    pub termination: TerminationPolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            base_delay: 1.0,
            request_timeout: 10_000,
            dequeue_wait: 2_000,
            termination: TerminationPolicy::default(),
        }
    }
}

impl CrawlerConfig {
    /// The base delay as a `Duration`
    ///
    /// Fails for a negative, non-finite or unrepresentable `base_delay`.
    pub fn politeness_delay(&self) -> ConfigResult<Duration> {
        Duration::try_from_secs_f64(self.base_delay).map_err(|e| {
            ConfigError::Validation(format!("invalid base_delay {}: {}", self.base_delay, e))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }

    pub fn idle_wait(&self) -> Duration {
        Duration::from_millis(self.dequeue_wait)
    }
}

/// Condition under which an idle worker exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationPolicy {
    /// Exit once nothing is pending and no other worker holds an address
    #[default]
    Quiescent,

    /// Exit as soon as nothing is pending, even while other workers are
    /// still fetching pages that may add more work
    PendingEmpty,
}

/// Request identity configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// User-Agent strings picked at random for each request
    pub pool: Vec<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            pool: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory; pages go to `<root>/html`, text to `<root>/text`
    pub root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./crawled_data"),
        }
    }
}
