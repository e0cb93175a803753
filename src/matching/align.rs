//! Pure alignment scoring: edit distance + token overlap.
//!
//! [`AlignmentScorer::align`] compares a transcribed query against one
//! canonical line and produces an [`AlignmentResult`].  Both sides are run
//! through the recognition-error normalizer first so systematic confusions
//! do not count against the score.
//!
//! The combined score blends two views of similarity:
//!
//! ```text
//! combined = (1 - edit_ratio) · 0.6  +  token_overlap · 0.4
//! ```
//!
//! Character-level edit distance is sensitive to local recognition noise;
//! token overlap is robust to word order and catches paraphrased fragments.

use serde::Serialize;

use crate::corpus::CanonicalLine;
use crate::text::{normalize, word_tokens};

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Weight of the character-level similarity term.
const EDIT_WEIGHT: f32 = 0.6;

/// Weight of the token-overlap term.
const OVERLAP_WEIGHT: f32 = 0.4;

// ---------------------------------------------------------------------------
// AlignmentResult
// ---------------------------------------------------------------------------

/// Outcome of aligning one query against one canonical line.
///
/// Serializable so downstream consumers can carry it as audit data.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentResult {
    /// The (raw) query text that was aligned.
    pub query_text: String,
    /// The canonical line aligned against, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_line: Option<CanonicalLine>,
    /// Character-level Levenshtein distance between the normalized texts.
    pub edit_distance: usize,
    /// `edit_distance / max(len)`, in `[0, 1]`; 0 when both sides are empty.
    pub edit_ratio: f32,
    /// Jaccard overlap of Gurmukhi word-token sets, in `[0, 1]`.
    pub token_overlap: f32,
    /// Weighted blend of the two terms, in `[0, 1]`.
    pub combined_score: f32,
    /// Alias of `combined_score` carried for downstream policy decisions.
    pub confidence: f32,
    /// Whether `combined_score` reached the scorer's alignment threshold.
    pub is_confident_match: bool,
}

// ---------------------------------------------------------------------------
// Scoring primitives
// ---------------------------------------------------------------------------

/// Classic Levenshtein distance over chars, two-row dynamic programming.
///
/// `O(len(a)·len(b))` time, `O(min)` extra space.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Normalized edit distance: `levenshtein / max(char_len)`, 0 when both
/// strings are empty.
pub fn edit_ratio(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    levenshtein(a, b) as f32 / max_len as f32
}

/// Jaccard overlap of the Gurmukhi word-token sets of `a` and `b`.
///
/// Returns 0 when either side has no Gurmukhi tokens.
pub fn token_overlap(a: &str, b: &str) -> f32 {
    let set_a: std::collections::HashSet<String> = word_tokens(a).into_iter().collect();
    let set_b: std::collections::HashSet<String> = word_tokens(b).into_iter().collect();

    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f32 / union as f32
}

// ---------------------------------------------------------------------------
// AlignmentScorer
// ---------------------------------------------------------------------------

/// Stateless scorer carrying only the published confidence threshold.
#[derive(Debug, Clone)]
pub struct AlignmentScorer {
    alignment_threshold: f32,
}

impl AlignmentScorer {
    /// Create a scorer with the given confidence threshold.
    pub fn new(alignment_threshold: f32) -> Self {
        Self {
            alignment_threshold,
        }
    }

    /// The threshold above which a match is confident.
    pub fn threshold(&self) -> f32 {
        self.alignment_threshold
    }

    /// Align `query` against one canonical `line`.
    pub fn align(&self, query: &str, line: &CanonicalLine) -> AlignmentResult {
        let norm_query = normalize(query);
        let norm_canonical = normalize(&line.text);

        let edit_distance = levenshtein(&norm_query, &norm_canonical);
        let ratio = edit_ratio(&norm_query, &norm_canonical);
        let overlap = token_overlap(&norm_query, &norm_canonical);

        let combined =
            ((1.0 - ratio) * EDIT_WEIGHT + overlap * OVERLAP_WEIGHT).clamp(0.0, 1.0);

        AlignmentResult {
            query_text: query.to_string(),
            matched_line: Some(line.clone()),
            edit_distance,
            edit_ratio: ratio,
            token_overlap: overlap,
            combined_score: combined,
            confidence: combined,
            is_confident_match: combined >= self.alignment_threshold,
        }
    }
}

impl Default for AlignmentScorer {
    fn default() -> Self {
        Self::new(crate::config::MatcherConfig::default().alignment_threshold)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
