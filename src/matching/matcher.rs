//! Matching orchestration: index lookup → normalization → scoring → ranking.
//!
//! # Overview
//!
//! [`Matcher`] owns the [`ScriptureIndex`] boundary and the
//! [`AlignmentScorer`], and turns a raw query into at most one ranked
//! [`AlignmentResult`].
//!
//! Failure policy at this boundary:
//!
//! * An index error is logged and downgraded to "no candidates" — matching
//!   is a best-effort enrichment, never a reason to fail a span.
//! * A malformed reference record (empty canonical text) is skipped; the
//!   remaining candidates still compete.
//! * "No match" is an ordinary [`None`], never an error.

use std::sync::Arc;

use serde::Serialize;

use crate::config::MatcherConfig;
use crate::corpus::{CanonicalLine, ScriptureIndex, ScriptureSource};
use crate::matching::align::{AlignmentResult, AlignmentScorer};
use crate::text::normalize;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum combined score a best alignment must reach to be returned at all.
///
/// Deliberately a fixed constant, separate from the configurable
/// `alignment_threshold`: below this floor a "best" alignment is noise and
/// not worth surfacing even for audit ranking.
pub const MIN_RETURN_SCORE: f32 = 0.5;

// ---------------------------------------------------------------------------
// MatchOutcome
// ---------------------------------------------------------------------------

/// Result of [`Matcher::match_and_align`]: the text to carry forward, the
/// confidence attached to it, and the alignment kept for audit (present even
/// when the text was not replaced).
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    /// Canonical text when the alignment cleared the threshold, otherwise
    /// the original query.
    pub text: String,
    /// Confidence to attach to the span.
    pub confidence: f32,
    /// The best alignment, when one reached [`MIN_RETURN_SCORE`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AlignmentResult>,
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

/// Orchestrates candidate lookup and alignment ranking over one index.
pub struct Matcher {
    index: Arc<dyn ScriptureIndex>,
    scorer: AlignmentScorer,
    config: MatcherConfig,
}

impl Matcher {
    /// Create a matcher over `index` with the given configuration.
    pub fn new(index: Arc<dyn ScriptureIndex>, config: MatcherConfig) -> Self {
        let scorer = AlignmentScorer::new(config.alignment_threshold);
        Self {
            index,
            scorer,
            config,
        }
    }

    /// The configured alignment threshold.
    pub fn alignment_threshold(&self) -> f32 {
        self.config.alignment_threshold
    }

    // -----------------------------------------------------------------------
    // Candidate lookup
    // -----------------------------------------------------------------------

    /// Fetch up to `top_k` candidate lines for `text` from the index.
    ///
    /// The query is normalized first and the index is asked for a fuzzy
    /// search.  When `ang_hint` is given the results are stably re-sorted to
    /// prefer lines whose locator matches the hint, ties broken by longer
    /// canonical text first.
    ///
    /// Index failures are logged and yield an empty list.
    pub fn find_candidates(
        &self,
        text: &str,
        source: Option<ScriptureSource>,
        top_k: usize,
        ang_hint: Option<&str>,
    ) -> Vec<CanonicalLine> {
        let normalized = normalize(text);

        let mut lines = match self.index.search(&normalized, source, top_k, true) {
            Ok(lines) => lines,
            Err(e) => {
                log::warn!("matcher: index lookup failed, treating as no match: {e}");
                return Vec::new();
            }
        };

        if let Some(hint) = ang_hint {
            lines.sort_by(|a, b| {
                let a_hit = a.locator.as_deref() == Some(hint);
                let b_hit = b.locator.as_deref() == Some(hint);
                b_hit
                    .cmp(&a_hit)
                    .then_with(|| b.text.chars().count().cmp(&a.text.chars().count()))
            });
        }

        lines
    }

    // -----------------------------------------------------------------------
    // Alignment ranking
    // -----------------------------------------------------------------------

    /// Align `query` against `candidates` (fetched from the index when
    /// absent) and return the best result, if it clears [`MIN_RETURN_SCORE`].
    ///
    /// Malformed records are skipped; the sort is stable so equal scores
    /// keep the index's relevance order.
    pub fn find_best_alignment(
        &self,
        query: &str,
        candidates: Option<Vec<CanonicalLine>>,
        source: Option<ScriptureSource>,
        ang_hint: Option<&str>,
    ) -> Option<AlignmentResult> {
        let candidates = candidates.unwrap_or_else(|| {
            self.find_candidates(query, source, self.config.top_k, ang_hint)
        });

        let mut results: Vec<AlignmentResult> = candidates
            .iter()
            .filter(|line| {
                if line.is_malformed() {
                    log::debug!("matcher: skipping malformed reference record id={}", line.id);
                    false
                } else {
                    true
                }
            })
            .map(|line| self.scorer.align(query, line))
            .collect();

        results.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results
            .into_iter()
            .next()
            .filter(|best| best.combined_score >= MIN_RETURN_SCORE)
    }

    /// Match `query` and decide which text to carry forward.
    ///
    /// | Outcome | text | confidence | result |
    /// |---------|------|------------|--------|
    /// | No alignment ≥ [`MIN_RETURN_SCORE`] | query | 0.5 | `None` |
    /// | Score ≥ effective threshold | canonical | alignment confidence | `Some` |
    /// | Score below threshold | query | alignment confidence | `Some` (audit) |
    ///
    /// `threshold_override` substitutes the configured `alignment_threshold`
    /// for this call only.
    pub fn match_and_align(
        &self,
        query: &str,
        source: Option<ScriptureSource>,
        ang_hint: Option<&str>,
        threshold_override: Option<f32>,
    ) -> MatchOutcome {
        let threshold = threshold_override.unwrap_or(self.config.alignment_threshold);

        match self.find_best_alignment(query, None, source, ang_hint) {
            None => MatchOutcome {
                text: query.to_string(),
                confidence: 0.5,
                result: None,
            },
            Some(result) => {
                let confidence = result.confidence;
                let text = if result.combined_score >= threshold {
                    result
                        .matched_line
                        .as_ref()
                        .map(|l| l.text.clone())
                        .unwrap_or_else(|| query.to_string())
                } else {
                    query.to_string()
                };
                MatchOutcome {
                    text,
                    confidence,
                    result: Some(result),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
