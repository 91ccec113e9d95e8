// Error types for the public index surface
// Internal plumbing (file sources, config loading) stays on anyhow::Result;
// only the operations exposed by SymbolIndex return IndexError.

use std::path::PathBuf;

/// Errors returned by [`crate::SymbolIndex`] operations
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Another `index_directory` call is still running
    #[error("Indexing already in progress")]
    IndexingInProgress,

    /// The scan root does not exist or is not a directory
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// The worker task that owns the store has stopped
    #[error("Index worker is no longer running")]
    WorkerUnavailable,

    /// Enumerating the scan root failed as a whole
    #[error("File source error: {0}")]
    Source(anyhow::Error),
}

pub type IndexResult<T> = std::result::Result<T, IndexError>;
