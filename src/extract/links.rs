//! Link extraction from fetched pages
//!
//! Anchors are collected from the parsed document, resolved against the
//! page's own address, and filtered down to addresses on the crawl's target
//! host.

use crate::url::is_in_scope;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Extracts every in-scope link from a page
///
/// # Extraction Rules
///
/// - Only `<a>` elements carrying an `href` are considered
/// - Each href is resolved against `page` with standard URL joining, so
///   scheme-relative (`//host/x`), path-relative (`x`, `../x`) and
///   fragment-only (`#x`) references all become absolute
/// - A resolved link is kept only if [`is_in_scope`] holds for `target_host`
/// - An href that cannot be resolved is skipped
///
/// The parser recovers from malformed markup, so a broken document yields
/// whatever anchors could be recognised rather than an error.
///
/// # Arguments
///
/// * `page` - Address of the page the markup came from
/// * `markup` - The page's HTML
/// * `target_host` - Network location the crawl is confined to
///
/// # Returns
///
/// The set of absolute in-scope addresses, sorted
///
/// # Example
///
/// ```
/// use shoal::extract_links;
/// use url::Url;
///
/// let page = Url::parse("http://example.test/").unwrap();
/// let html = r#"<a href="/a">A</a><a href="http://other.test/c">C</a>"#;
/// let links = extract_links(&page, html, "example.test");
/// assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["http://example.test/a"]);
/// ```
pub fn extract_links(page: &Url, markup: &str, target_host: &str) -> BTreeSet<String> {
    let document = Html::parse_document(markup);
    let mut links = BTreeSet::new();

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(absolute) = resolve_link(href, page) {
            if is_in_scope(&absolute, target_host) {
                links.insert(absolute);
            }
        }
    }

    links
}

/// Resolves an href to an absolute address
///
/// Returns None if the href is blank or cannot be joined onto the base.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    base_url.join(href).ok().map(String::from)
}
