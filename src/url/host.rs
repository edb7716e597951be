use crate::{UrlError, UrlResult};
use url::Url;

/// Returns the network location of a URL: its host, plus the port when the
/// URL names a non-default one
///
/// Hosts are already lowercased by the URL parser. Two URLs are on the same
/// crawl target exactly when their network locations are equal.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shoal::url::network_location;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(network_location(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(network_location(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn network_location(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Parses the seed address of a crawl
///
/// The seed must be an absolute URL with both a scheme and a host. The
/// returned URL's serialization is the address admitted to the frontier.
pub fn parse_seed(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::InvalidSeed {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if network_location(&url).is_none() {
        return Err(UrlError::InvalidSeed {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}

/// Derives the crawl's target host from its seed
pub fn target_host(seed: &Url) -> UrlResult<String> {
    network_location(seed).ok_or_else(|| UrlError::MissingHost(seed.to_string()))
}
