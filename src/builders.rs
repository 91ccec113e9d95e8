// Builder Patterns
// Fluent builders for the indexer configuration and the index handle,
// with validation at build time.

use anyhow::{ensure, Result};
use std::sync::Arc;

use crate::config::IndexerConfig;
use crate::contracts::FileSource;
use crate::file_source::LocalFileSource;
use crate::language::Language;
use crate::service::SymbolIndex;

/// Fluent builder for [`IndexerConfig`]
pub struct IndexerConfigBuilder {
    config: IndexerConfig,
}

impl IndexerConfigBuilder {
    /// Start from the default whitelist and blacklist
    pub fn new() -> Self {
        Self {
            config: IndexerConfig::default(),
        }
    }

    /// Restrict indexing to the extensions of the given languages
    pub fn languages(mut self, languages: &[Language]) -> Self {
        self.config.extensions = languages
            .iter()
            .flat_map(|lang| lang.extensions().iter().map(|ext| ext.to_string()))
            .collect();
        self
    }

    /// Replace the extension whitelist
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Add one directory name to the blacklist
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.config.excluded_dirs.contains(&name) {
            self.config.excluded_dirs.push(name);
        }
        self
    }

    /// Replace the directory blacklist
    pub fn excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.excluded_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn request_queue_capacity(mut self, capacity: usize) -> Result<Self> {
        ensure!(capacity > 0, "Request queue capacity must be greater than zero");
        self.config.request_queue_capacity = capacity;
        Ok(self)
    }

    pub fn progress_interval(mut self, interval: usize) -> Result<Self> {
        ensure!(interval > 0, "Progress interval must be greater than zero");
        self.config.progress_interval = interval;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<IndexerConfig> {
        ensure!(
            !self.config.extensions.is_empty(),
            "At least one extension must be indexed"
        );
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for IndexerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent builder for [`SymbolIndex`]
pub struct SymbolIndexBuilder {
    source: Option<Arc<dyn FileSource>>,
    config: Option<IndexerConfig>,
}

impl SymbolIndexBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            config: None,
        }
    }

    /// Set the file source (defaults to the local filesystem)
    pub fn source(mut self, source: Arc<dyn FileSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the configuration (defaults to [`IndexerConfig::default`])
    pub fn config(mut self, config: IndexerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validate the configuration and spawn the index worker
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<SymbolIndex> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let source = self
            .source
            .unwrap_or_else(|| Arc::new(LocalFileSource::new()));
        Ok(SymbolIndex::new(source, config))
    }
}

impl Default for SymbolIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}
