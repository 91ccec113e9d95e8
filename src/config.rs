use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::language::{default_extensions, Language};

/// Directory names skipped during a scan
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "build",
    ".build",
    "DerivedData",
    "node_modules",
    "Pods",
    "Carthage",
    ".git",
    "__pycache__",
    "target",
    "dist",
    "vendor",
    ".venv",
];

pub const DEFAULT_REQUEST_QUEUE_CAPACITY: usize = 64;
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Extension whitelist, without the leading dot
    pub extensions: Vec<String>,
    /// Directory names whose contents are never indexed
    pub excluded_dirs: Vec<String>,
    /// Requests buffered for the index worker before callers wait to enqueue
    pub request_queue_capacity: usize,
    /// Log a progress event every N indexed files
    pub progress_interval: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            request_queue_capacity: DEFAULT_REQUEST_QUEUE_CAPACITY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl IndexerConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: IndexerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `CODESCOPE_*` environment variables
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(capacity) = std::env::var("CODESCOPE_QUEUE_CAPACITY") {
            config.request_queue_capacity = capacity
                .parse()
                .context("CODESCOPE_QUEUE_CAPACITY must be a positive integer")?;
        }
        if let Ok(interval) = std::env::var("CODESCOPE_PROGRESS_INTERVAL") {
            config.progress_interval = interval
                .parse()
                .context("CODESCOPE_PROGRESS_INTERVAL must be a positive integer")?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.request_queue_capacity > 0,
            "request_queue_capacity must be greater than zero"
        );
        ensure!(
            self.progress_interval > 0,
            "progress_interval must be greater than zero"
        );
        for ext in &self.extensions {
            ensure!(
                Language::from_extension(ext).is_some(),
                "No symbol rules for extension '{}'",
                ext
            );
        }
        Ok(())
    }

    /// Language for `path` if its extension is on the whitelist
    pub fn language_for(&self, path: &Path) -> Option<Language> {
        let language = Language::from_path(path)?;
        let ext = path.extension()?.to_str()?;
        self.extensions
            .iter()
            .any(|allowed| allowed == ext)
            .then_some(language)
    }
}
