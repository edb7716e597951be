use crate::url::host::network_location;
use url::Url;

/// Path suffixes of resources that never carry page text
pub const DENIED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".pdf", ".zip", ".tar", ".gz", ".mp3", ".mp4", ".avi",
    ".mov", ".css", ".js",
];

/// Checks whether a candidate address belongs to the crawl
///
/// A candidate is in scope when all of the following hold:
/// 1. It parses as an absolute URL
/// 2. Its network location equals `target_host` exactly (no subdomain folding)
/// 3. Its scheme is `http` or `https`
/// 4. Its lowercased path does not end with a denied extension
///
/// Any parse failure maps to `false`.
///
/// # Examples
///
/// ```
/// use shoal::url::is_in_scope;
///
/// assert!(is_in_scope("https://example.com/docs", "example.com"));
/// assert!(!is_in_scope("https://blog.example.com/docs", "example.com"));
/// assert!(!is_in_scope("https://example.com/logo.PNG", "example.com"));
/// assert!(!is_in_scope("ftp://example.com/file", "example.com"));
/// ```
pub fn is_in_scope(candidate: &str, target_host: &str) -> bool {
    let Ok(url) = Url::parse(candidate) else {
        return false;
    };

    if network_location(&url).as_deref() != Some(target_host) {
        return false;
    }

    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    let path = url.path().to_lowercase();
    !DENIED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
