// In-memory index store
// A path-keyed map of whole-file records. Inserts replace, nothing is ever
// pruned: a file deleted from disk keeps its entry until the same path is
// indexed again.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::pure::scoring;
use crate::pure::statistics::compute_statistics;
use crate::types::{IndexStatistics, IndexedFile, SearchHit, SimilarFile};

#[derive(Debug, Default)]
pub struct IndexStore {
    files: HashMap<PathBuf, Arc<IndexedFile>>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the record for `file.path`
    ///
    /// Returns the previous record, if any.
    pub fn upsert(&mut self, file: IndexedFile) -> Option<Arc<IndexedFile>> {
        self.files.insert(file.path.clone(), Arc::new(file))
    }

    pub fn get(&self, path: &Path) -> Option<&Arc<IndexedFile>> {
        self.files.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Relevance-ranked files for `query`; an empty query matches nothing
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let query_lower = query.to_lowercase();
        let scored: Vec<_> = self
            .files
            .values()
            .map(|file| (Arc::clone(file), scoring::relevance_score(file, &query_lower)))
            .collect();

        scoring::rank(scored, limit)
            .into_iter()
            .map(|(file, score)| SearchHit { file, score })
            .collect()
    }

    /// Files ranked by similarity to the record at `path`, excluding itself
    ///
    /// An unknown path yields an empty list.
    pub fn find_similar(&self, path: &Path, limit: usize) -> Vec<SimilarFile> {
        let Some(target) = self.files.get(path) else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }

        let target_names = scoring::symbol_names(target);
        let scored: Vec<_> = self
            .files
            .iter()
            .filter(|(candidate_path, _)| candidate_path.as_path() != path)
            .map(|(_, candidate)| {
                (
                    Arc::clone(candidate),
                    scoring::similarity_score(target, &target_names, candidate),
                )
            })
            .collect();

        scoring::rank(scored, limit)
            .into_iter()
            .map(|(file, score)| SimilarFile { file, score })
            .collect()
    }

    pub fn statistics(&self) -> IndexStatistics {
        compute_statistics(self.files.values().map(Arc::as_ref))
    }
}
