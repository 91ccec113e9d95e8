// File Source Implementations
// LocalFileSource walks the real filesystem; MemoryFileSource serves an
// in-memory tree (editor buffers, tests) through the same contract.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::contracts::{FileContents, FileSource};

/// Filesystem-backed source
///
/// Directory enumeration runs on the blocking pool; reads go through `tokio::fs`.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSource;

impl LocalFileSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSource for LocalFileSource {
    async fn is_dir(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    async fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        tokio::fs::canonicalize(path)
            .await
            .with_context(|| format!("Failed to canonicalize {}", path.display()))
    }

    async fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let root = root.to_path_buf();
        tokio::task::spawn_blocking(move || {
            WalkDir::new(&root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .collect::<Vec<_>>()
        })
        .await
        .context("Directory walk task failed")
    }

    async fn read_file(&self, path: &Path) -> Result<FileContents> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let text = String::from_utf8(bytes)
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
        // Metadata supplies only the timestamp; size must match the bytes read
        let modified = tokio::fs::metadata(path)
            .await
            .and_then(|metadata| metadata.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(FileContents {
            size: text.len() as u64,
            text,
            modified,
        })
    }
}

#[derive(Debug, Clone)]
enum MemoryEntry {
    Text(String, DateTime<Utc>),
    Unreadable,
}

/// In-memory source keyed by absolute path
///
/// Paths are used verbatim as store keys; `canonicalize` is the identity.
#[derive(Debug, Default)]
pub struct MemoryFileSource {
    files: RwLock<BTreeMap<PathBuf, MemoryEntry>>,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a readable file
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files
            .write()
            .insert(path.into(), MemoryEntry::Text(text.into(), Utc::now()));
    }

    /// Add a file that shows up in listings but fails to read
    pub fn insert_unreadable(&self, path: impl Into<PathBuf>) {
        self.files.write().insert(path.into(), MemoryEntry::Unreadable);
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        self.files.write().remove(path.as_ref()).is_some()
    }
}

#[async_trait]
impl FileSource for MemoryFileSource {
    async fn is_dir(&self, path: &Path) -> bool {
        self.files
            .read()
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }

    async fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        Ok(path.to_path_buf())
    }

    async fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .read()
            .keys()
            .filter(|file| *file != root && file.starts_with(root))
            .cloned()
            .collect())
    }

    async fn read_file(&self, path: &Path) -> Result<FileContents> {
        match self.files.read().get(path) {
            Some(MemoryEntry::Text(text, modified)) => Ok(FileContents {
                size: text.len() as u64,
                text: text.clone(),
                modified: *modified,
            }),
            Some(MemoryEntry::Unreadable) => bail!("{} is unreadable", path.display()),
            None => bail!("{} does not exist", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_listing_skips_directories() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join("src/nested"))?;
        fs::write(temp_dir.path().join("src/nested/lib.rs"), "fn a() {}")?;
        fs::write(temp_dir.path().join("README.md"), "# readme")?;

        let source = LocalFileSource::new();
        let files = source.list_files(temp_dir.path()).await?;

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.starts_with(temp_dir.path())));
        assert!(source.is_dir(temp_dir.path()).await);
        assert!(!source.is_dir(&temp_dir.path().join("README.md")).await);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_local_listing_ignores_symlink_cycles() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir(temp_dir.path().join("a"))?;
        fs::write(temp_dir.path().join("a/main.py"), "def main(): pass")?;
        std::os::unix::fs::symlink(temp_dir.path(), temp_dir.path().join("a/loop"))?;

        let files = LocalFileSource::new().list_files(temp_dir.path()).await?;

        assert_eq!(files, vec![temp_dir.path().join("a/main.py")]);
        Ok(())
    }

    #[tokio::test]
    async fn test_local_read_rejects_invalid_utf8() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("blob.swift");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80])?;

        assert!(LocalFileSource::new().read_file(&path).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_local_size_matches_retained_text() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("Greeting.swift");
        fs::write(&path, "let greeting = \"héllo\"\n")?;

        let contents = LocalFileSource::new().read_file(&path).await?;

        // Rewriting the file afterwards must not change what was captured
        fs::write(&path, "let greeting = \"a much longer replacement\"\n")?;
        assert_eq!(contents.size, contents.text.len() as u64);
        assert_eq!(contents.size, 24);
        Ok(())
    }

    #[tokio::test]
    async fn test_local_read_captures_size() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("main.go");
        fs::write(&path, "package main\n")?;

        let contents = LocalFileSource::new().read_file(&path).await?;
        assert_eq!(contents.text, "package main\n");
        assert_eq!(contents.size, 13);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_source() -> Result<()> {
        let source = MemoryFileSource::new();
        source.insert("/repo/src/app.ts", "export class App {}");
        source.insert_unreadable("/repo/src/broken.ts");

        assert!(source.is_dir(Path::new("/repo")).await);
        assert!(!source.is_dir(Path::new("/repo/src/app.ts")).await);
        assert_eq!(source.list_files(Path::new("/repo")).await?.len(), 2);
        assert!(source.read_file(Path::new("/repo/src/broken.ts")).await.is_err());

        let contents = source.read_file(Path::new("/repo/src/app.ts")).await?;
        assert_eq!(contents.size, 19);

        assert!(source.remove("/repo/src/app.ts"));
        assert!(source.read_file(Path::new("/repo/src/app.ts")).await.is_err());
        Ok(())
    }
}
