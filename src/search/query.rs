//! Weighted, bounded queries against a [`DocsIndex`].

use super::index::{DocsIndex, Field, term_counts};
use serde::Serialize;

/// Fewest results a query returns (when anything matches).
pub const MIN_RESULTS: usize = 1;
/// Most results a query returns.
pub const MAX_RESULTS: usize = 10;
/// Result count used when the caller does not ask for one.
pub const DEFAULT_RESULTS: i64 = 5;

/// Filename reported for a hit whose document cannot be resolved.
const UNKNOWN_FILENAME: &str = "Unknown";

/// Relative importance of each field when ranking.
///
/// Weights are expected to be positive; a field with weight `0` is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub content: f32,
    pub filename: f32,
}

impl Default for FieldWeights {
    /// Content matches count twice as much as filename matches.
    fn default() -> Self {
        Self {
            content: 2.0,
            filename: 1.0,
        }
    }
}

impl FieldWeights {
    pub const fn get(&self, field: Field) -> f32 {
        match field {
            Field::Content => self.content,
            Field::Filename => self.filename,
        }
    }
}

/// One ranked document as produced by the scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedHit {
    pub doc: usize,
    pub score: f32,
}

/// A search hit as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub filename: String,
    pub content: String,
    pub score: f64,
}

/// Clamps a requested result count into `[MIN_RESULTS, MAX_RESULTS]`.
pub fn clamp_num_results(requested: i64) -> usize {
    usize::try_from(requested)
        .unwrap_or(MIN_RESULTS)
        .clamp(MIN_RESULTS, MAX_RESULTS)
}

impl DocsIndex {
    /// Ranks documents for `query`, best first, keeping only positive scores.
    ///
    /// Equal scores keep document order.
    pub fn rank(&self, query: &str, weights: &FieldWeights) -> Vec<RankedHit> {
        let query_terms = term_counts(self.tokenizer.tokenize(query));
        if query_terms.is_empty() {
            return vec![];
        }

        let mut scores = vec![0.0f32; self.documents.len()];
        for (field, index) in &self.fields {
            let weight = weights.get(*field);
            if weight > 0.0 {
                index.accumulate(&query_terms, weight, &mut scores);
            }
        }

        let mut hits: Vec<RankedHit> = scores
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score > 0.0)
            .map(|(doc, score)| RankedHit { doc, score })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits
    }

    /// Searches the index and returns at most `num_results` results.
    ///
    /// `num_results` is clamped into `[1, 10]`; truncation happens after ranking.
    pub fn search(&self, query: &str, weights: &FieldWeights, num_results: i64) -> Vec<SearchResult> {
        let limit = clamp_num_results(num_results);
        self.rank(query, weights)
            .into_iter()
            .take(limit)
            .map(|hit| self.resolve(hit))
            .collect()
    }

    /// Turns a scorer hit into the caller-facing result shape.
    ///
    /// Never fails: an unknown document or a non-finite score is replaced by a
    /// placeholder value.
    pub fn resolve(&self, hit: RankedHit) -> SearchResult {
        let score = if hit.score.is_finite() {
            f64::from(hit.score)
        } else {
            0.0
        };
        match self.documents.get(hit.doc) {
            Some(doc) => SearchResult {
                filename: doc.filename.clone(),
                content: doc.content.clone(),
                score,
            },
            None => SearchResult {
                filename: UNKNOWN_FILENAME.to_string(),
                content: String::new(),
                score,
            },
        }
    }
}
