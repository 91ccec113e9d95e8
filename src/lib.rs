// codescope - In-memory codebase symbol index and search engine
// Root library module

pub mod builders;
pub mod config;
pub mod contracts;
pub mod error;
pub mod file_source;
pub mod indexer;
pub mod language;
pub mod observability;
pub mod parsing;
pub mod path_utils;
pub mod pure;
pub mod service;
pub mod store;
pub mod types;

// Re-export key types
pub use observability::{
    get_metrics, init_logging, init_logging_with_level, log_operation, record_metric,
    with_trace_id, MetricType, Operation, OperationContext, PerfTimer,
};

pub use contracts::{FileContents, FileSource};
pub use error::{IndexError, IndexResult};

pub use types::{
    IndexStatistics, IndexedFile, ScanSummary, SearchHit, SimilarFile, Symbol, SymbolKind,
};

pub use builders::{IndexerConfigBuilder, SymbolIndexBuilder};
pub use config::IndexerConfig;
pub use language::Language;

// Re-export implementations
pub use file_source::{LocalFileSource, MemoryFileSource};
pub use indexer::DirectoryIndexer;
pub use parsing::extract_symbols;
pub use service::SymbolIndex;
pub use store::IndexStore;

// Re-export pure functions
pub use pure::scoring;
pub use pure::statistics::compute_statistics;
