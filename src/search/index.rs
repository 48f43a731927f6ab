//! TF-IDF inverted index over the documentation fields.

use crate::archive::Document;
use crate::error::{Error, Result};
use ahash::AHashMap;
use std::time::Instant;

use super::tokenize::Tokenizer;

/// Searchable document fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Content,
    Filename,
}

impl Field {
    /// Every field the index is built over.
    pub const ALL: [Self; 2] = [Self::Content, Self::Filename];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Filename => "filename",
        }
    }

    pub(crate) fn text(self, document: &Document) -> &str {
        match self {
            Self::Content => &document.content,
            Self::Filename => &document.filename,
        }
    }
}

/// Posting list of one term: its IDF and (document index, normalized weight) pairs
/// in ascending document order.
#[derive(Debug, Default)]
struct TermEntry {
    idf: f32,
    docs: Vec<(u32, f32)>,
}

/// Inverted index for a single field.
///
/// Document vectors use sublinear term frequency (`1 + ln(tf)`) times a
/// smoothed IDF (`ln((1 + N) / (1 + df)) + 1`) and are L2-normalized, so the
/// dot product with a normalized query vector is their cosine similarity.
#[derive(Debug, Default)]
pub(crate) struct TermIndex {
    terms: AHashMap<String, TermEntry>,
}

impl TermIndex {
    pub(crate) fn build<'a>(texts: impl Iterator<Item = &'a str>, tokenizer: &Tokenizer) -> Self {
        let per_doc: Vec<Vec<(String, u32)>> = texts
            .map(|text| term_counts(tokenizer.tokenize(text)))
            .collect();

        let mut doc_freq: AHashMap<&str, u32> = AHashMap::new();
        for counts in &per_doc {
            for (term, _) in counts {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let total_docs = per_doc.len() as f32;
        let idf_of = |df: u32| ((1.0 + total_docs) / (1.0 + df as f32)).ln() + 1.0;

        let mut terms: AHashMap<String, TermEntry> = AHashMap::with_capacity(doc_freq.len());
        for (doc_idx, counts) in per_doc.iter().enumerate() {
            let weights: Vec<f32> = counts
                .iter()
                .map(|(term, count)| sublinear_tf(*count) * idf_of(doc_freq[term.as_str()]))
                .collect();
            let norm = weights.iter().map(|w| w * w).sum::<f32>().sqrt();
            if norm == 0.0 {
                continue;
            }

            let doc_idx = u32::try_from(doc_idx).unwrap_or(u32::MAX);
            for ((term, _), weight) in counts.iter().zip(weights) {
                let entry = terms.entry(term.clone()).or_insert_with(|| TermEntry {
                    idf: idf_of(doc_freq[term.as_str()]),
                    docs: Vec::new(),
                });
                entry.docs.push((doc_idx, weight / norm));
            }
        }

        Self { terms }
    }

    /// Adds `weight × cosine(query, document)` to each document's score.
    pub(crate) fn accumulate(&self, query_terms: &[(String, u32)], weight: f32, scores: &mut [f32]) {
        let query: Vec<(&TermEntry, f32)> = query_terms
            .iter()
            .filter_map(|(term, count)| {
                self.terms
                    .get(term)
                    .map(|entry| (entry, sublinear_tf(*count) * entry.idf))
            })
            .collect();

        let norm = query.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm == 0.0 {
            return;
        }

        for (entry, query_weight) in query {
            let factor = weight * query_weight / norm;
            for &(doc_idx, doc_weight) in &entry.docs {
                if let Some(score) = scores.get_mut(doc_idx as usize) {
                    *score += factor * doc_weight;
                }
            }
        }
    }

    pub(crate) fn term_count(&self) -> usize {
        self.terms.len()
    }
}

/// Counts tokens and returns them sorted by term, so iteration order (and
/// therefore floating-point summation order) never depends on hashing.
pub(crate) fn term_counts(tokens: Vec<String>) -> Vec<(String, u32)> {
    let mut counts: AHashMap<String, u32> = AHashMap::with_capacity(tokens.len());
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
    counts
}

fn sublinear_tf(count: u32) -> f32 {
    1.0 + (count as f32).ln()
}

/// Immutable search index over a set of documents.
///
/// Built once by [`DocsIndex::build`]; there are no add or remove operations.
pub struct DocsIndex {
    pub(super) documents: Vec<Document>,
    pub(super) fields: Vec<(Field, TermIndex)>,
    pub(super) tokenizer: Tokenizer,
}

impl std::fmt::Debug for DocsIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsIndex")
            .field("documents", &self.documents.len())
            .field(
                "terms",
                &self
                    .fields
                    .iter()
                    .map(|(field, index)| (field.name(), index.term_count()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl DocsIndex {
    /// Indexes `documents` over every [`Field`].
    ///
    /// Fails with [`Error::EmptyCorpus`] when there is nothing to index.
    pub fn build(documents: Vec<Document>) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let start = Instant::now();
        let tokenizer = Tokenizer::default();
        let fields = Field::ALL
            .iter()
            .map(|&field| {
                let texts = documents.iter().map(|doc| field.text(doc));
                (field, TermIndex::build(texts, &tokenizer))
            })
            .collect();

        let index = Self {
            documents,
            fields,
            tokenizer,
        };

        tracing::info!(
            "Built search index: {} documents, {} content terms, {} filename terms in {:?}",
            index.len(),
            index.term_count(Field::Content),
            index.term_count(Field::Filename),
            start.elapsed()
        );

        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of distinct terms indexed for `field`.
    pub fn term_count(&self, field: Field) -> usize {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map_or(0, |(_, index)| index.term_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    fn doc(filename: &str, content: &str) -> Document {
        Document {
            filename: filename.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let_assert!(Err(Error::EmptyCorpus) = DocsIndex::build(vec![]));
    }

    #[test]
    fn builds_both_fields() {
        let index = DocsIndex::build(vec![
            doc("docs/servers/tools.mdx", "Tools let clients call functions"),
            doc("docs/intro.md", "Welcome to the documentation"),
        ])
        .unwrap();

        check!(index.len() == 2);
        check!(index.term_count(Field::Content) > 0);
        check!(index.term_count(Field::Filename) > 0);
    }

    #[test]
    fn document_vectors_are_normalized() {
        let tokenizer = Tokenizer::default();
        let index = TermIndex::build(["alpha beta beta", "beta gamma"].into_iter(), &tokenizer);

        let mut squared = [0.0f32; 2];
        for entry in index.terms.values() {
            for &(doc, weight) in &entry.docs {
                squared[doc as usize] += weight * weight;
            }
        }
        for total in squared {
            check!((total - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let tokenizer = Tokenizer::default();
        let index = TermIndex::build(
            ["server common", "client common", "other common"].into_iter(),
            &tokenizer,
        );
        check!(index.terms["server"].idf > index.terms["common"].idf);
    }

    #[test]
    fn term_counts_are_sorted() {
        let counts = term_counts(vec!["b".into(), "a".into(), "b".into()]);
        check!(counts == vec![("a".to_string(), 1), ("b".to_string(), 2)]);
    }
}
