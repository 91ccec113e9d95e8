// Core Types - records held by the index and returned by its queries
// IndexedFile values are shared as Arc and always replaced whole, never edited in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::language::Language;

/// Closed set of declaration kinds the extractor recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    /// class, struct, enum, protocol, interface, trait
    Type,
    Property,
    Method,
}

impl SymbolKind {
    /// Function and method symbols keep their declaring line
    pub fn carries_signature(self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Method)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::Function => "function",
            SymbolKind::Type => "type",
            SymbolKind::Property => "property",
            SymbolKind::Method => "method",
        };
        f.write_str(s)
    }
}

/// A named declaration found on a single line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// 1-based line number
    pub line: usize,
    pub signature: Option<String>,
}

/// One record per indexed file, keyed by `path` in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedFile {
    pub path: PathBuf,
    pub content: String,
    pub language: Language,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
    pub symbols: Vec<Symbol>,
}

/// Snapshot computed from the store on demand
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub total_symbols: usize,
    pub language_counts: BTreeMap<Language, usize>,
}

/// A relevance-ranked search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub file: Arc<IndexedFile>,
    pub score: f64,
}

/// A file ranked by similarity to a query file
#[derive(Debug, Clone, Serialize)]
pub struct SimilarFile {
    pub file: Arc<IndexedFile>,
    pub score: f64,
}

/// Counters for a single directory scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Files read and inserted into the store
    pub indexed: usize,
    /// Files rejected by the extension whitelist or directory blacklist
    pub skipped: usize,
    /// Files that matched but could not be read or decoded
    pub failed: usize,
    /// Symbols extracted across all indexed files
    pub symbols: usize,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_kinds() {
        assert!(SymbolKind::Function.carries_signature());
        assert!(SymbolKind::Method.carries_signature());
        assert!(!SymbolKind::Type.carries_signature());
        assert!(!SymbolKind::Property.carries_signature());
    }

    #[test]
    fn test_symbol_kind_serialization() {
        let symbol = Symbol {
            name: "loadProfile".to_string(),
            kind: SymbolKind::Function,
            line: 12,
            signature: Some("func loadProfile() async throws".to_string()),
        };
        let json = serde_json::to_value(&symbol).unwrap();
        assert_eq!(json["kind"], "function");
        assert_eq!(json["line"], 12);
        assert_eq!(SymbolKind::Type.to_string(), "type");
    }
}
