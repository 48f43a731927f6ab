//! Full-text search over extracted documentation.
//!
//! This module provides TF-IDF based search across documents, including
//! tokenization, per-field indexing and weighted query ranking.

pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod tokenize;

pub use index::{DocsIndex, Field};
pub use query::{
    DEFAULT_RESULTS, FieldWeights, MAX_RESULTS, MIN_RESULTS, RankedHit, SearchResult,
    clamp_num_results,
};
