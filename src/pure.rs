// Pure Functions
// Scoring, ranking and statistics over indexed records. No I/O, no locking:
// the worker that owns the store calls these with borrowed snapshots.

use std::collections::HashSet;
use std::sync::Arc;

use crate::types::{IndexStatistics, IndexedFile};

/// Relevance and similarity heuristics
pub mod scoring {
    use super::*;

    /// Query found in the file path
    pub const PATH_MATCH_WEIGHT: f64 = 10.0;
    /// Per symbol whose name contains the query
    pub const SYMBOL_MATCH_WEIGHT: f64 = 5.0;
    /// Per occurrence of the query in the file content
    pub const CONTENT_OCCURRENCE_WEIGHT: f64 = 0.5;
    /// Candidate shares the query file's language
    pub const SAME_LANGUAGE_WEIGHT: f64 = 5.0;
    /// Per symbol name present in both files
    pub const SHARED_SYMBOL_WEIGHT: f64 = 2.0;

    /// Non-overlapping occurrences of `needle` in `haystack`
    ///
    /// Equivalent to splitting on `needle` and counting segments minus one:
    /// "aaaa" contains "aa" twice, not three times.
    pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
        if needle.is_empty() {
            return 0;
        }
        haystack.matches(needle).count()
    }

    /// Additive relevance of `file` for an already-lowercased query
    pub fn relevance_score(file: &IndexedFile, query_lower: &str) -> f64 {
        if query_lower.is_empty() {
            return 0.0;
        }

        let mut score = 0.0;

        if file
            .path
            .to_string_lossy()
            .to_lowercase()
            .contains(query_lower)
        {
            score += PATH_MATCH_WEIGHT;
        }

        let matching_symbols = file
            .symbols
            .iter()
            .filter(|symbol| symbol.name.to_lowercase().contains(query_lower))
            .count();
        score += matching_symbols as f64 * SYMBOL_MATCH_WEIGHT;

        let occurrences = count_occurrences(&file.content.to_lowercase(), query_lower);
        score += occurrences as f64 * CONTENT_OCCURRENCE_WEIGHT;

        score
    }

    /// Distinct symbol names of a file
    pub fn symbol_names(file: &IndexedFile) -> HashSet<&str> {
        file.symbols.iter().map(|s| s.name.as_str()).collect()
    }

    /// Similarity of `candidate` to the file whose language and names are given
    pub fn similarity_score(
        target: &IndexedFile,
        target_names: &HashSet<&str>,
        candidate: &IndexedFile,
    ) -> f64 {
        let mut score = 0.0;

        if candidate.language == target.language {
            score += SAME_LANGUAGE_WEIGHT;
        }

        let shared = symbol_names(candidate).intersection(target_names).count();
        score += shared as f64 * SHARED_SYMBOL_WEIGHT;

        score
    }

    /// Drop zero scores, sort descending with path as tie-break, keep `limit`
    pub fn rank(mut scored: Vec<(Arc<IndexedFile>, f64)>, limit: usize) -> Vec<(Arc<IndexedFile>, f64)> {
        scored.retain(|(_, score)| *score > 0.0);
        scored.sort_by(|(a_file, a_score), (b_file, b_score)| {
            b_score
                .total_cmp(a_score)
                .then_with(|| a_file.path.cmp(&b_file.path))
        });
        scored.truncate(limit);
        scored
    }
}

/// Aggregate statistics
pub mod statistics {
    use super::*;

    /// Fold a set of records into totals and per-language counts
    pub fn compute_statistics<'a>(files: impl IntoIterator<Item = &'a IndexedFile>) -> IndexStatistics {
        files
            .into_iter()
            .fold(IndexStatistics::default(), |mut stats, file| {
                stats.total_files += 1;
                stats.total_size += file.size;
                stats.total_symbols += file.symbols.len();
                *stats.language_counts.entry(file.language).or_insert(0) += 1;
                stats
            })
    }
}
