//! Language tags derived from file extensions
//!
//! The tag selects which lexical rule table the extractor applies to a file,
//! and the set of known extensions doubles as the indexer's whitelist.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Languages the symbol extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    Swift,
    ObjectiveC,
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Go,
    Kotlin,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::Swift,
        Language::ObjectiveC,
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Rust,
        Language::Go,
        Language::Kotlin,
    ];

    /// File extensions (without the dot) mapped to this language
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::Swift => &["swift"],
            Language::ObjectiveC => &["m", "mm", "h"],
            Language::Python => &["py"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::TypeScript => &["ts", "tsx"],
            Language::Rust => &["rs"],
            Language::Go => &["go"],
            Language::Kotlin => &["kt", "kts"],
        }
    }

    /// Look up the language for an extension. Matching is case-sensitive.
    pub fn from_extension(ext: &str) -> Option<Language> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&ext))
    }

    pub fn from_path(path: &Path) -> Option<Language> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Swift => "swift",
            Language::ObjectiveC => "objective-c",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Kotlin => "kotlin",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Every extension the extractor has a rule table for
pub fn default_extensions() -> Vec<String> {
    Language::ALL
        .iter()
        .flat_map(|lang| lang.extensions().iter().map(|ext| ext.to_string()))
        .collect()
}
