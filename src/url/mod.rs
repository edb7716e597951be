//! URL handling module for Shoal
//!
//! This module decides which addresses belong to a crawl, derives the
//! crawl's target host from its seed, and maps addresses to file names.

mod filename;
mod host;
mod scope;

// Re-export main functions
pub use filename::{derive_filename, derive_stem, ArtifactKind, MAX_STEM_LEN};
pub use host::{network_location, parse_seed, target_host};
pub use scope::{is_in_scope, DENIED_EXTENSIONS};
