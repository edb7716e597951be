use sha2::{Digest, Sha256};
use url::Url;

/// Longest stem (name without extension) before truncation kicks in
pub const MAX_STEM_LEN: usize = 200;

/// Length a too-long stem is cut back to before its hash suffix is added
const TRUNCATED_LEN: usize = 190;

/// Hash suffixes are reduced modulo this value
const HASH_MODULUS: u64 = 10_000;

/// The two stores a page is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Raw markup as fetched
    Html,
    /// Text extracted from the markup
    Text,
}

impl ArtifactKind {
    /// File extension used for this kind of artifact
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "txt",
        }
    }
}

/// Maps an address to a filesystem-safe name, without extension
///
/// # Derivation Steps
///
/// 1. Take the path component; empty or `/` becomes `/index`
/// 2. Replace every character outside `[A-Za-z0-9_-]` with `_`
/// 3. If a query string is present, append `_query_<h>` where `h` is a
///    hash of the query modulo 10000
/// 4. If the name now exceeds 200 characters, cut it to 190 and append
///    `_hash_<h2>` where `h2` is a hash of the full address modulo 10000
///
/// The result is deterministic across calls and processes but not
/// collision-free.
///
/// # Examples
///
/// ```
/// use shoal::url::derive_stem;
///
/// assert_eq!(derive_stem("http://example.test/"), "_index");
/// assert_eq!(derive_stem("http://example.test/docs/intro.html"), "_docs_intro_html");
/// ```
pub fn derive_stem(address: &str) -> String {
    let (path, query) = split_address(address);

    let path = if path.is_empty() || path == "/" {
        "/index"
    } else {
        path.as_str()
    };

    let mut stem: String = path
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        stem.push_str(&format!("_query_{}", short_hash(&query)));
    }

    // Stem is pure ASCII here, so byte truncation is char-safe
    if stem.len() > MAX_STEM_LEN {
        stem.truncate(TRUNCATED_LEN);
        stem.push_str(&format!("_hash_{}", short_hash(address)));
    }

    stem
}

/// Maps an address to the file name used for one kind of artifact
///
/// # Examples
///
/// ```
/// use shoal::url::{derive_filename, ArtifactKind};
///
/// assert_eq!(derive_filename("http://example.test/a", ArtifactKind::Html), "_a.html");
/// assert_eq!(derive_filename("http://example.test/a", ArtifactKind::Text), "_a.txt");
/// ```
pub fn derive_filename(address: &str, kind: ArtifactKind) -> String {
    format!("{}.{}", derive_stem(address), kind.extension())
}

/// Splits an address into its path and query
///
/// Unparseable addresses are split textually so derivation never fails.
fn split_address(address: &str) -> (String, Option<String>) {
    match Url::parse(address) {
        Ok(url) => (url.path().to_string(), url.query().map(str::to_string)),
        Err(_) => {
            let without_fragment = address.split('#').next().unwrap_or_default();
            match without_fragment.split_once('?') {
                Some((path, query)) => (path.to_string(), Some(query.to_string())),
                None => (without_fragment.to_string(), None),
            }
        }
    }
}

/// Stable hash of a string, reduced modulo 10000
fn short_hash(input: &str) -> u64 {
    let digest = Sha256::digest(input.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix) % HASH_MODULUS
}
