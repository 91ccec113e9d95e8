//! Symbol index service
//!
//! A single worker task owns the [`IndexStore`] and serves requests from a
//! bounded channel, one at a time. A directory scan runs to completion inside
//! the worker, so queries sent during a scan wait behind it and never see a
//! half-finished scan. [`SymbolIndex`] is the cloneable handle callers use.
//!
//! Re-entrant scans are rejected rather than queued: the `indexing` flag is
//! claimed before a scan request is enqueued and released by the worker once
//! the scan ends.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::config::IndexerConfig;
use crate::contracts::FileSource;
use crate::error::{IndexError, IndexResult};
use crate::file_source::LocalFileSource;
use crate::indexer::DirectoryIndexer;
use crate::observability::{log_operation, Operation, OperationContext};
use crate::store::IndexStore;
use crate::types::{IndexStatistics, ScanSummary, SearchHit, SimilarFile};

/// Holds the `indexing` flag; releasing happens on drop, including when a
/// scan request is dropped before the worker ever receives it
struct IndexingGuard(Arc<AtomicBool>);

impl IndexingGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for IndexingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

enum Request {
    IndexDirectory {
        root: PathBuf,
        guard: IndexingGuard,
        reply: oneshot::Sender<IndexResult<ScanSummary>>,
    },
    Search {
        query: String,
        limit: usize,
        reply: oneshot::Sender<Vec<SearchHit>>,
    },
    FindSimilar {
        path: PathBuf,
        limit: usize,
        reply: oneshot::Sender<Vec<SimilarFile>>,
    },
    Statistics {
        reply: oneshot::Sender<IndexStatistics>,
    },
}

struct IndexWorker {
    store: IndexStore,
    indexer: DirectoryIndexer,
}

impl IndexWorker {
    async fn run(mut self, mut requests: mpsc::Receiver<Request>) {
        let ctx = OperationContext::new("index_worker");
        log_operation::<IndexError>(
            &ctx,
            &Operation::Startup {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            &Ok(()),
        );

        while let Some(request) = requests.recv().await {
            self.handle(&ctx, request).await;
        }

        debug!("Index worker stopped with {} files", self.store.len());
        log_operation::<IndexError>(
            &ctx,
            &Operation::Shutdown {
                reason: "all index handles dropped".to_string(),
            },
            &Ok(()),
        );
    }

    async fn handle(&mut self, parent: &OperationContext, request: Request) {
        match request {
            Request::IndexDirectory { root, guard, reply } => {
                let mut ctx = parent.child("index_directory");
                ctx.add_attribute("root", root.display().to_string());
                let result = self.indexer.scan(&root, &mut self.store).await;
                // Release before replying so the caller can rescan immediately
                drop(guard);

                let (indexed, failed) = match &result {
                    Ok(summary) => (summary.indexed, summary.failed),
                    Err(_) => (0, 0),
                };
                log_operation(
                    &ctx,
                    &Operation::IndexDirectory {
                        root,
                        files_indexed: indexed,
                        files_failed: failed,
                    },
                    &result.as_ref().map(|_| ()),
                );
                let _ = reply.send(result);
            }
            Request::Search {
                query,
                limit,
                reply,
            } => {
                let ctx = parent.child("search");
                let hits = self.store.search(&query, limit);
                log_operation::<IndexError>(
                    &ctx,
                    &Operation::Search {
                        query,
                        result_count: hits.len(),
                    },
                    &Ok(()),
                );
                let _ = reply.send(hits);
            }
            Request::FindSimilar { path, limit, reply } => {
                let ctx = parent.child("find_similar_files");
                let similar = self.store.find_similar(&path, limit);
                log_operation::<IndexError>(
                    &ctx,
                    &Operation::SimilarityLookup {
                        path,
                        result_count: similar.len(),
                    },
                    &Ok(()),
                );
                let _ = reply.send(similar);
            }
            Request::Statistics { reply } => {
                let ctx = parent.child("get_statistics");
                let stats = self.store.statistics();
                log_operation::<IndexError>(
                    &ctx,
                    &Operation::Statistics {
                        total_files: stats.total_files,
                    },
                    &Ok(()),
                );
                let _ = reply.send(stats);
            }
        }
    }
}

/// Handle to the symbol index worker
///
/// Cloning is cheap; all clones talk to the same store. The worker exits
/// once every handle has been dropped.
#[derive(Clone)]
pub struct SymbolIndex {
    requests: mpsc::Sender<Request>,
    indexing: Arc<AtomicBool>,
    source: Arc<dyn FileSource>,
}

impl SymbolIndex {
    /// Spawn a worker reading through `source`
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(source: Arc<dyn FileSource>, config: IndexerConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.request_queue_capacity.max(1));
        let worker = IndexWorker {
            store: IndexStore::new(),
            indexer: DirectoryIndexer::new(Arc::clone(&source), config),
        };
        tokio::spawn(worker.run(rx));

        Self {
            requests: tx,
            indexing: Arc::new(AtomicBool::new(false)),
            source,
        }
    }

    /// Spawn a worker over the local filesystem with default configuration
    pub fn local() -> Self {
        Self::new(Arc::new(LocalFileSource::new()), IndexerConfig::default())
    }

    /// Whether a scan is currently running
    pub fn is_indexing(&self) -> bool {
        self.indexing.load(Ordering::Acquire)
    }

    /// Scan `root` and return the number of files indexed by this call
    pub async fn index_directory(&self, root: impl AsRef<Path>) -> IndexResult<usize> {
        self.index_directory_with_summary(root)
            .await
            .map(|summary| summary.indexed)
    }

    /// Scan `root` and return the full per-scan counters
    pub async fn index_directory_with_summary(
        &self,
        root: impl AsRef<Path>,
    ) -> IndexResult<ScanSummary> {
        let Some(guard) = IndexingGuard::acquire(&self.indexing) else {
            warn!("Rejected scan of {}: indexing already in progress", root.as_ref().display());
            return Err(IndexError::IndexingInProgress);
        };

        let (reply, response) = oneshot::channel();
        self.send(Request::IndexDirectory {
            root: root.as_ref().to_path_buf(),
            guard,
            reply,
        })
        .await?;
        response.await.map_err(|_| IndexError::WorkerUnavailable)?
    }

    /// Relevance-ranked files for `query`, at most `limit`
    pub async fn search(&self, query: &str, limit: usize) -> IndexResult<Vec<SearchHit>> {
        let (reply, response) = oneshot::channel();
        self.send(Request::Search {
            query: query.to_string(),
            limit,
            reply,
        })
        .await?;
        response.await.map_err(|_| IndexError::WorkerUnavailable)
    }

    /// Files most similar to the one at `path`, excluding itself
    pub async fn find_similar_files(
        &self,
        path: impl AsRef<Path>,
        limit: usize,
    ) -> IndexResult<Vec<SimilarFile>> {
        let path = path.as_ref();
        let key = self
            .source
            .canonicalize(path)
            .await
            .unwrap_or_else(|_| path.to_path_buf());

        let (reply, response) = oneshot::channel();
        self.send(Request::FindSimilar {
            path: key,
            limit,
            reply,
        })
        .await?;
        response.await.map_err(|_| IndexError::WorkerUnavailable)
    }

    pub async fn get_statistics(&self) -> IndexResult<IndexStatistics> {
        let (reply, response) = oneshot::channel();
        self.send(Request::Statistics { reply }).await?;
        response.await.map_err(|_| IndexError::WorkerUnavailable)
    }

    async fn send(&self, request: Request) -> IndexResult<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| IndexError::WorkerUnavailable)
    }
}
