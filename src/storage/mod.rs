//! Storage module for persisting crawl artifacts
//!
//! Every fetched HTML page produces one artifact with two halves: the raw
//! markup and its extracted text. Both are written once, under a file name
//! derived from the page's address.

mod fs;
mod traits;

pub use fs::{FsStore, HTML_DIR, TEXT_DIR};
pub use traits::{ArtifactPaths, ArtifactStore, PageArtifact, StorageError, StorageResult};

use crate::ShoalError;
use std::path::Path;

/// Opens the filesystem store under `root`, creating its directories
///
/// # Returns
///
/// * `Ok(FsStore)` - Store ready for writing
/// * `Err(ShoalError)` - The output directories could not be created
pub fn open_store(root: &Path) -> Result<FsStore, ShoalError> {
    Ok(FsStore::new(root)?)
}
