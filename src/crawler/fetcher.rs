//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with a per-request timeout
//! - Waiting out the politeness delay before every request
//! - Sending browser-like headers with a rotated User-Agent
//! - Classifying the response as HTML, non-HTML or an error
//!
//! Requests are never retried; a failed address is simply counted.

use crate::crawler::politeness::Politeness;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Accept header sent with every request
pub const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml";

/// Accept-Language header sent with every request
pub const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";

/// Result of a successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// HTML page, ready for persisting and extraction
    Html {
        /// HTTP status code
        status: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body
        body: String,
    },

    /// 2xx response whose Content-Type is not HTML
    NonHtml {
        /// HTTP status code
        status: u16,
        /// The Content-Type received, empty if absent
        content_type: String,
    },
}

impl FetchResult {
    pub fn is_html(&self) -> bool {
        matches!(self, Self::Html { .. })
    }
}

/// Why an address could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Could not connect to {url}: {source}")]
    Connect {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Classifies a transport error from reqwest
    fn from_transport(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            FetchError::Timeout { url }
        } else if err.is_connect() {
            FetchError::Connect { url, source: err }
        } else {
            FetchError::Request { url, source: err }
        }
    }

    /// Returns true for errors caused by the request timing out
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => true,
            FetchError::Body { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

/// Builds the HTTP client shared by every worker
///
/// The User-Agent is set per request, so none is configured here.
///
/// # Arguments
///
/// * `timeout` - Bound on each request, from connect to the end of the body
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if a Content-Type value denotes HTML
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

/// Fetches pages politely
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    politeness: Arc<Politeness>,
}

impl Fetcher {
    pub fn new(client: Client, politeness: Arc<Politeness>) -> Self {
        Self { client, politeness }
    }

    /// Waits out the politeness delay, then GETs `address` once
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResult::Html)` - 2xx with an HTML content type
    /// * `Ok(FetchResult::NonHtml)` - 2xx with any other content type
    /// * `Err(FetchError)` - Transport failure or non-2xx status
    pub async fn fetch(&self, address: &str) -> Result<FetchResult, FetchError> {
        let plan = self.politeness.next_plan();
        if !plan.delay.is_zero() {
            tokio::time::sleep(plan.delay).await;
        }

        tracing::trace!("GET {} as {}", address, plan.user_agent);

        let response = self
            .client
            .get(address)
            .header(USER_AGENT, plan.user_agent.as_str())
            .header(ACCEPT, ACCEPT_VALUE)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .header(CONNECTION, "keep-alive")
            .send()
            .await
            .map_err(|e| FetchError::from_transport(address, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: address.to_string(),
                status,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html_content_type(&content_type) {
            return Ok(FetchResult::NonHtml {
                status: status.as_u16(),
                content_type,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: address.to_string(),
            source,
        })?;

        Ok(FetchResult::Html {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
