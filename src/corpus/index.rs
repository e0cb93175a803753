//! The scripture index boundary.
//!
//! # Overview
//!
//! [`ScriptureIndex`] is the external capability this core consumes: given a
//! query it returns a best-effort, relevance-ordered list of
//! [`CanonicalLine`]s.  It is object-safe and `Send + Sync` so it can be held
//! behind an `Arc<dyn ScriptureIndex>` — one implementation per collection,
//! keeping the matcher source-agnostic.
//!
//! [`InMemoryIndex`] is the reference implementation over a loaded line set,
//! scoring by Gurmukhi token overlap.  It serves tests and embedders that
//! have no external search service.

use std::collections::HashSet;

use thiserror::Error;

use crate::corpus::line::{CanonicalLine, ScriptureSource};
use crate::text::{normalize, word_tokens};

// ---------------------------------------------------------------------------
// IndexError
// ---------------------------------------------------------------------------

/// All errors that can surface from a scripture index.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    /// The reference corpus was unavailable or empty at construction.
    /// Fatal: raised once at startup, never during matching.
    #[error("reference corpus unavailable: {0}")]
    CorpusUnavailable(String),

    /// A lookup against the index failed.  Callers downgrade this to
    /// "no match" at the matcher boundary.
    #[error("index lookup failed: {0}")]
    Lookup(String),
}

// ---------------------------------------------------------------------------
// ScriptureIndex trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to a scripture search index.
///
/// # Contract
///
/// - Returns at most `top_k` lines, best-effort relevance order; no ordering
///   guarantee beyond that.
/// - `source` restricts results to one collection when given.
/// - `fuzzy` permits the index to normalize / approximate-match the query.
/// - Returned records may be malformed (empty text); callers skip those.
pub trait ScriptureIndex: Send + Sync {
    /// Search the index for lines resembling `query`.
    fn search(
        &self,
        query: &str,
        source: Option<ScriptureSource>,
        top_k: usize,
        fuzzy: bool,
    ) -> Result<Vec<CanonicalLine>, IndexError>;
}

// Compile-time assertion: Box<dyn ScriptureIndex> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn ScriptureIndex>) {}
};

// ---------------------------------------------------------------------------
// InMemoryIndex
// ---------------------------------------------------------------------------

/// Token-overlap index over a loaded line set.
///
/// Lines are tokenized once at construction; each search is a linear scan
/// scoring Jaccard overlap between the query's Gurmukhi tokens and each
/// line's.  Adequate for a few tens of thousands of lines, which covers the
/// canonical corpora this crate targets.
#[derive(Debug)]
pub struct InMemoryIndex {
    entries: Vec<IndexEntry>,
}

#[derive(Debug)]
struct IndexEntry {
    line: CanonicalLine,
    tokens: HashSet<String>,
}

impl InMemoryIndex {
    /// Build an index from a set of canonical lines.
    ///
    /// Line text is normalized before tokenization so fuzzy queries and
    /// entries meet on the same footing.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::CorpusUnavailable`] when `lines` is empty —
    /// a construction-time configuration failure, per the startup contract.
    pub fn from_lines(lines: Vec<CanonicalLine>) -> Result<Self, IndexError> {
        if lines.is_empty() {
            return Err(IndexError::CorpusUnavailable(
                "no canonical lines supplied".into(),
            ));
        }

        let entries = lines
            .into_iter()
            .map(|line| {
                let tokens = word_tokens(&normalize(&line.text)).into_iter().collect();
                IndexEntry { line, tokens }
            })
            .collect();

        Ok(Self { entries })
    }

    /// Number of lines held by the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the index holds no lines (never, post-construction).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ScriptureIndex for InMemoryIndex {
    fn search(
        &self,
        query: &str,
        source: Option<ScriptureSource>,
        top_k: usize,
        fuzzy: bool,
    ) -> Result<Vec<CanonicalLine>, IndexError> {
        let query_text = if fuzzy {
            normalize(query)
        } else {
            query.to_string()
        };
        let query_tokens: HashSet<String> = word_tokens(&query_text).into_iter().collect();
        if query_tokens.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f32, &CanonicalLine)> = self
            .entries
            .iter()
            .filter(|e| source.is_none_or(|s| e.line.source == s))
            .filter_map(|e| {
                let inter = query_tokens.intersection(&e.tokens).count();
                if inter == 0 {
                    return None;
                }
                let union = query_tokens.union(&e.tokens).count();
                Some((inter as f32 / union as f32, &e.line))
            })
            .collect();

        // Highest overlap first; ties broken by line id for determinism.
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, line)| line.clone())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// An index that always fails — exercises the matcher's degrade-to-no-match
/// path without a real backend.
#[cfg(test)]
pub struct FailingIndex;

#[cfg(test)]
impl ScriptureIndex for FailingIndex {
    fn search(
        &self,
        _query: &str,
        _source: Option<ScriptureSource>,
        _top_k: usize,
        _fuzzy: bool,
    ) -> Result<Vec<CanonicalLine>, IndexError> {
        Err(IndexError::Lookup("backend unreachable".into()))
    }
}

/// An index that returns a fixed result list regardless of the query.
#[cfg(test)]
pub struct FixedIndex(pub Vec<CanonicalLine>);

#[cfg(test)]
impl ScriptureIndex for FixedIndex {
    fn search(
        &self,
        _query: &str,
        source: Option<ScriptureSource>,
        top_k: usize,
        _fuzzy: bool,
    ) -> Result<Vec<CanonicalLine>, IndexError> {
        Ok(self
            .0
            .iter()
            .filter(|l| source.is_none_or(|s| l.source == s))
            .take(top_k)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lines() -> Vec<CanonicalLine> {
        vec![
            CanonicalLine::new(1, "ਸਤਿਗੁਰ ਪ੍ਰਸਾਦਿ", ScriptureSource::Sggs),
            CanonicalLine::new(2, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", ScriptureSource::Sggs),
            CanonicalLine::new(3, "ਵਾਹਿਗੁਰੂ ਜੀ ਕੀ ਫਤਹਿ", ScriptureSource::DasamGranth),
        ]
    }

    // --- construction ---

    #[test]
    fn empty_corpus_is_a_construction_error() {
        let err = InMemoryIndex::from_lines(Vec::new()).unwrap_err();
        assert!(matches!(err, IndexError::CorpusUnavailable(_)));
    }

    #[test]
    fn construction_counts_lines() {
        let index = InMemoryIndex::from_lines(sample_lines()).unwrap();
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
    }

    // --- search ---

    #[test]
    fn exact_line_ranks_first() {
        let index = InMemoryIndex::from_lines(sample_lines()).unwrap();
        let hits = index.search("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", None, 3, true).unwrap();
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn source_filter_restricts_results() {
        let index = InMemoryIndex::from_lines(sample_lines()).unwrap();
        let hits = index
            .search("ਵਾਹਿਗੁਰੂ ਫਤਹਿ", Some(ScriptureSource::Sggs), 3, true)
            .unwrap();
        assert!(hits.iter().all(|l| l.source == ScriptureSource::Sggs));
    }

    #[test]
    fn no_overlap_returns_empty() {
        let index = InMemoryIndex::from_lines(sample_lines()).unwrap();
        let hits = index.search("ਮਨਮੁਖ", None, 3, true).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn ascii_query_returns_empty() {
        let index = InMemoryIndex::from_lines(sample_lines()).unwrap();
        let hits = index.search("hello world", None, 3, true).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn top_k_caps_result_count() {
        let index = InMemoryIndex::from_lines(sample_lines()).unwrap();
        let hits = index.search("ਹਰਿ ਸਤਿਗੁਰ ਵਾਹਿਗੁਰੂ ਨਾਮੁ", None, 1, true).unwrap();
        assert!(hits.len() <= 1);
    }

    #[test]
    fn fuzzy_search_normalizes_query() {
        let index = InMemoryIndex::from_lines(sample_lines()).unwrap();
        // Doubled matra in the query is repaired before token lookup.
        let hits = index.search("ਸਤਿਗੁਰ ਪ੍ਰਸਾਾਦਿ", None, 3, true).unwrap();
        assert_eq!(hits[0].id, 1);
    }

    // --- object safety ---

    #[test]
    fn index_is_object_safe() {
        let index: Box<dyn ScriptureIndex> =
            Box::new(InMemoryIndex::from_lines(sample_lines()).unwrap());
        let _ = index.search("ਹਰਿ", None, 1, true);
    }
}
