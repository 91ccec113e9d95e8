// Contract-First Design
// The index reaches the filesystem only through FileSource, so scans can run
// against the local disk or an in-memory tree with identical semantics.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Text and metadata of one file, as captured at read time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    pub text: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// Supplier of directory listings and file text
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Whether `path` names an existing directory
    ///
    /// # Postconditions
    /// - Returns false for missing paths and for regular files
    /// - Never fails; unreadable metadata counts as "not a directory"
    async fn is_dir(&self, path: &Path) -> bool;

    /// Resolve `path` to the form used as store keys
    ///
    /// # Postconditions
    /// - Paths returned by `list_files` under a canonical root are already canonical
    async fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Every regular file below `root`, recursively
    ///
    /// # Preconditions
    /// - `root` is a directory (checked by the caller)
    ///
    /// # Postconditions
    /// - Symbolic links are not followed
    /// - Entries that cannot be enumerated are skipped, not reported
    /// - Paths are prefixed by `root`
    async fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Read a file as UTF-8 text together with its size and modification time
    ///
    /// # Postconditions
    /// - Fails if the file is unreadable or not valid UTF-8
    async fn read_file(&self, path: &Path) -> Result<FileContents>;
}
