//! Storage traits and error types
//!
//! This module defines the trait interface for artifact stores and
//! associated error types.

use crate::url::ArtifactKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A completed fetch, ready to be written out
///
/// Artifacts live only for the processing of one address and are never
/// updated after being persisted.
#[derive(Debug, Clone)]
pub struct PageArtifact {
    /// Address the page was fetched from
    pub address: String,

    /// Raw markup as received
    pub markup: String,

    /// Visible text extracted from the markup
    pub text: String,
}

/// Where the two halves of an artifact were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub html: PathBuf,
    pub text: PathBuf,
}

/// Trait for artifact store implementations
///
/// Implementations are shared by every worker, so they must be safe to call
/// concurrently.
pub trait ArtifactStore: Send + Sync {
    /// Writes one artifact half under the name derived from `address`
    ///
    /// # Returns
    ///
    /// The path the contents were written to
    fn write(&self, kind: ArtifactKind, address: &str, contents: &str) -> StorageResult<PathBuf>;

    /// Directory holding artifacts of the given kind
    fn location(&self, kind: ArtifactKind) -> &Path;

    /// Writes the raw markup, then the extracted text
    fn persist(&self, artifact: &PageArtifact) -> StorageResult<ArtifactPaths> {
        let html = self.write(ArtifactKind::Html, &artifact.address, &artifact.markup)?;
        let text = self.write(ArtifactKind::Text, &artifact.address, &artifact.text)?;
        Ok(ArtifactPaths { html, text })
    }
}
