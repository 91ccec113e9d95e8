// Directory Indexer
// Walks a root through a FileSource, filters by extension whitelist and
// directory blacklist, extracts symbols and upserts one record per file.
// Per-file failures are counted and logged, never surfaced to the caller.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::IndexerConfig;
use crate::contracts::FileSource;
use crate::error::{IndexError, IndexResult};
use crate::observability::{record_metric, MetricType, PerfTimer};
use crate::parsing::extract_symbols;
use crate::path_utils::in_excluded_dir;
use crate::store::IndexStore;
use crate::types::{IndexedFile, ScanSummary};

pub struct DirectoryIndexer {
    source: Arc<dyn FileSource>,
    config: IndexerConfig,
}

impl DirectoryIndexer {
    /// Zero intervals are raised to one so progress logging never divides by zero
    pub fn new(source: Arc<dyn FileSource>, mut config: IndexerConfig) -> Self {
        config.progress_interval = config.progress_interval.max(1);
        Self { source, config }
    }

    /// Scan `root` to completion, writing every readable matching file into `store`
    ///
    /// # Errors
    /// - `InvalidPath` if `root` is missing or not a directory; `store` is untouched
    /// - `Source` if the directory listing itself fails
    pub async fn scan(&self, root: &Path, store: &mut IndexStore) -> IndexResult<ScanSummary> {
        if !self.source.is_dir(root).await {
            return Err(IndexError::InvalidPath(root.to_path_buf()));
        }
        let root = self
            .source
            .canonicalize(root)
            .await
            .map_err(|_| IndexError::InvalidPath(root.to_path_buf()))?;

        let timer = PerfTimer::new("index_directory");
        let files = self
            .source
            .list_files(&root)
            .await
            .map_err(IndexError::Source)?;
        debug!("Found {} candidate files under {}", files.len(), root.display());

        let mut summary = ScanSummary::default();

        for path in files {
            let Some(language) = self.config.language_for(&path) else {
                summary.skipped += 1;
                continue;
            };
            if in_excluded_dir(&path, &root, &self.config.excluded_dirs) {
                summary.skipped += 1;
                continue;
            }

            let contents = match self.source.read_file(&path).await {
                Ok(contents) => contents,
                Err(e) => {
                    debug!("Skipping {}: {:#}", path.display(), e);
                    summary.failed += 1;
                    continue;
                }
            };

            let symbols = extract_symbols(&contents.text, language);
            summary.symbols += symbols.len();
            summary.indexed += 1;

            if summary.indexed % self.config.progress_interval == 0 {
                debug!(
                    indexed = summary.indexed,
                    current_file = %path.file_name().unwrap_or_default().to_string_lossy(),
                    "Indexing progress"
                );
            }

            store.upsert(IndexedFile {
                path,
                content: contents.text,
                language,
                last_modified: contents.modified,
                size: contents.size,
                symbols,
            });
        }

        summary.elapsed = timer.elapsed();
        record_metric(MetricType::Gauge {
            name: "index.files",
            value: store.len() as f64,
        });
        info!(
            root = %root.display(),
            indexed = summary.indexed,
            skipped = summary.skipped,
            failed = summary.failed,
            symbols = summary.symbols,
            elapsed_ms = summary.elapsed.as_millis(),
            "Directory scan finished"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_source::MemoryFileSource;
    use std::path::PathBuf;

    fn indexer(source: Arc<MemoryFileSource>) -> DirectoryIndexer {
        DirectoryIndexer::new(source, IndexerConfig::default())
    }

    #[tokio::test]
    async fn test_scan_counts() -> anyhow::Result<()> {
        let source = Arc::new(MemoryFileSource::new());
        source.insert("/app/Sources/App.swift", "struct App {}\nfunc run() {}\n");
        source.insert("/app/README.md", "# App");
        source.insert("/app/build/Generated.swift", "struct Generated {}");
        source.insert_unreadable("/app/Sources/Broken.swift");

        let mut store = IndexStore::new();
        let summary = indexer(source).scan(Path::new("/app"), &mut store).await?;

        assert_eq!(summary.indexed, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.symbols, 2);
        assert!(store.contains(Path::new("/app/Sources/App.swift")));
        assert!(!store.contains(Path::new("/app/Sources/Broken.swift")));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_root_leaves_store_untouched() {
        let source = Arc::new(MemoryFileSource::new());
        source.insert("/app/main.py", "def main(): pass");

        let mut store = IndexStore::new();
        let indexer = indexer(source);
        indexer
            .scan(Path::new("/app"), &mut store)
            .await
            .expect("valid root");

        let err = indexer
            .scan(Path::new("/nowhere"), &mut store)
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::InvalidPath(p) if p == PathBuf::from("/nowhere")));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_custom_whitelist() -> anyhow::Result<()> {
        let source = Arc::new(MemoryFileSource::new());
        source.insert("/mixed/a.py", "def a(): pass");
        source.insert("/mixed/b.go", "func B() {}");

        let config = IndexerConfig {
            extensions: vec!["go".to_string()],
            ..IndexerConfig::default()
        };
        let mut store = IndexStore::new();
        let summary = DirectoryIndexer::new(source, config)
            .scan(Path::new("/mixed"), &mut store)
            .await?;

        assert_eq!(summary.indexed, 1);
        assert!(store.contains(Path::new("/mixed/b.go")));
        Ok(())
    }
}
