//! Blob fetching: logical file identifier → readable byte stream.
//!
//! The loader does not care whether a blob comes from a download cache or a
//! local checkout. Any failure is fatal for the split being read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use sleval_core::{Error, Result};

/// An opened blob.
pub struct FetchedBlob {
    /// Human-readable location, used in error messages.
    pub location: String,
    pub reader: Box<dyn BufRead + Send>,
}

impl std::fmt::Debug for FetchedBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchedBlob")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Trait for blob sources.
pub trait BlobFetcher: Send + Sync {
    /// Open a fresh stream for a logical file identifier.
    fn fetch(&self, logical: &str) -> Result<FetchedBlob>;
}

/// Resolves logical identifiers against a local directory.
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobFetcher for LocalFetcher {
    fn fetch(&self, logical: &str) -> Result<FetchedBlob> {
        let path = self.root.join(logical);
        let file = File::open(&path).map_err(|source| Error::Fetch {
            file: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Opened {}", path.display());
        Ok(FetchedBlob {
            location: path.display().to_string(),
            reader: Box::new(BufReader::new(file)),
        })
    }
}
