//! Fuzzy company-name resolution against a static company table.

use report_core::{CompanyRecord, StringSimilarity};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod similarity;
pub mod table;

pub use similarity::{normalize, JaroWinkler, LevenshteinRatio, TokenSortRatio, WeightedRatio};
pub use table::CompanyTable;

pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_THRESHOLD: u8 = 50;

/// A candidate company and how closely it matched the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub record: CompanyRecord,
    pub score: u8,
}

/// Rank table entries against `query`.
///
/// Keeps candidates scoring strictly above `threshold`, highest first, ties in
/// table order, at most `limit` of them. A blank query yields nothing.
pub fn rank(
    query: &str,
    table: &CompanyTable,
    similarity: &dyn StringSimilarity,
    limit: usize,
    threshold: u8,
) -> Vec<Match> {
    let query = normalize(query);
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut matches: Vec<Match> = table
        .iter()
        .map(|record| Match {
            score: similarity.score(&query, &normalize(&record.display_name)).min(100),
            record: record.clone(),
        })
        .filter(|m| m.score > threshold)
        .collect();

    // sort_by is stable, so equal scores keep table order
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(limit);
    matches
}

/// Display names of the best matches, highest similarity first
pub fn resolve(
    query: &str,
    table: &CompanyTable,
    similarity: &dyn StringSimilarity,
    limit: usize,
    threshold: u8,
) -> Vec<String> {
    rank(query, table, similarity, limit, threshold)
        .into_iter()
        .map(|m| m.record.display_name)
        .collect()
}

/// Resolver bound to a table, a scorer and its limits
#[derive(Clone)]
pub struct Resolver {
    table: Arc<CompanyTable>,
    similarity: Arc<dyn StringSimilarity>,
    limit: usize,
    threshold: u8,
}

impl Resolver {
    pub fn new(table: Arc<CompanyTable>) -> Self {
        Self {
            table,
            similarity: Arc::new(WeightedRatio),
            limit: DEFAULT_LIMIT,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn StringSimilarity>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn table(&self) -> &CompanyTable {
        &self.table
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn search(&self, query: &str) -> Vec<Match> {
        let matches = rank(query, &self.table, self.similarity.as_ref(), self.limit, self.threshold);
        tracing::debug!(
            "Resolved {:?} to {} candidate(s) (threshold {})",
            query,
            matches.len(),
            self.threshold
        );
        matches
    }

    pub fn resolve(&self, query: &str) -> Vec<String> {
        self.search(query)
            .into_iter()
            .map(|m| m.record.display_name)
            .collect()
    }
}
