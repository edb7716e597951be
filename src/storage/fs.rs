//! Filesystem artifact store
//!
//! Raw pages go to `<root>/html/<name>.html` and extracted text to
//! `<root>/text/<name>.txt`, both UTF-8.

use crate::storage::traits::{ArtifactStore, StorageError, StorageResult};
use crate::url::{derive_filename, ArtifactKind};
use std::path::{Path, PathBuf};

/// Subdirectory for raw markup
pub const HTML_DIR: &str = "html";

/// Subdirectory for extracted text
pub const TEXT_DIR: &str = "text";

/// Artifact store backed by two directories under one root
#[derive(Debug, Clone)]
pub struct FsStore {
    html_dir: PathBuf,
    text_dir: PathBuf,
}

impl FsStore {
    /// Creates a store rooted at `root`, creating both output directories
    /// if they are absent
    ///
    /// # Returns
    ///
    /// * `Ok(FsStore)` - Both directories exist and are ready
    /// * `Err(StorageError)` - A directory could not be created
    pub fn new(root: &Path) -> StorageResult<Self> {
        let html_dir = root.join(HTML_DIR);
        let text_dir = root.join(TEXT_DIR);

        for dir in [&html_dir, &text_dir] {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(Self { html_dir, text_dir })
    }
}

impl ArtifactStore for FsStore {
    fn write(&self, kind: ArtifactKind, address: &str, contents: &str) -> StorageResult<PathBuf> {
        let path = self.location(kind).join(derive_filename(address, kind));

        std::fs::write(&path, contents).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::trace!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }

    fn location(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Html => &self.html_dir,
            ArtifactKind::Text => &self.text_dir,
        }
    }
}
