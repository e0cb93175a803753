//! Replacement decision policy.
//!
//! # Overview
//!
//! [`Replacer`] converts a ranked [`AlignmentResult`] into a span mutation:
//!
//! | Match confidence | Displayed text | `needs_review` | Decision |
//! |------------------|----------------|----------------|----------|
//! | `< replace_threshold` (0.90) | unchanged | `true` | [`Decision::Flag`] |
//! | `[replace_threshold, 0.95)` | canonical | `true` | [`Decision::Replace`] |
//! | `≥ 0.95` | canonical | `false` | [`Decision::Replace`] |
//!
//! In every branch the original transcription is preserved into
//! `QuoteMatch::spoken_text` — set at most once, never overwritten on a
//! repeat call — and the span's confidence is only ever raised, never
//! lowered.

use crate::config::ReplaceConfig;
use crate::matching::AlignmentResult;
use crate::pipeline::span::{MatchMethod, QuoteMatch, SpanKind, TranscriptSpan};
use crate::pipeline::state::Decision;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Confidence at or above which a replacement is fully automatic (no review
/// flag).  Fixed rather than configurable: it is the published boundary of
/// the "never silently corrupt" guarantee.
pub const AUTO_ACCEPT_THRESHOLD: f32 = 0.95;

// ---------------------------------------------------------------------------
// Replacer
// ---------------------------------------------------------------------------

/// Applies the replacement policy to one span at a time.
#[derive(Debug, Clone)]
pub struct Replacer {
    replace_threshold: f32,
}

impl Replacer {
    /// Create a replacer with the given policy configuration.
    pub fn new(config: ReplaceConfig) -> Self {
        Self {
            replace_threshold: config.replace_threshold,
        }
    }

    /// Pure predicate: would a match at `confidence` replace the text?
    ///
    /// Mirrors the first branch of [`apply`](Self::apply) without mutating
    /// anything.
    pub fn should_replace(&self, confidence: f32) -> bool {
        confidence >= self.replace_threshold
    }

    /// Apply the policy to `span` for the given alignment.
    ///
    /// Idempotent with respect to provenance: a second call with the same
    /// match re-attaches metadata but never overwrites the already-preserved
    /// `spoken_text`, and never lowers the span's confidence.
    pub fn apply(&self, span: &mut TranscriptSpan, result: &AlignmentResult) -> Decision {
        let Some(line) = result.matched_line.as_ref() else {
            // An alignment with no line cannot drive a mutation.
            log::debug!("replacer: alignment without matched line, rejecting");
            return Decision::Reject;
        };

        // Preserve provenance exactly once: a prior match already holds the
        // original spoken text.
        let spoken_text = span
            .quote_match
            .as_ref()
            .map(|m| m.spoken_text.clone())
            .unwrap_or_else(|| span.text.clone());

        let quote_match = QuoteMatch {
            source: line.source,
            line_id: line.id,
            canonical_text: line.text.clone(),
            spoken_text,
            confidence: result.confidence,
            match_method: if result.edit_distance == 0 {
                MatchMethod::Exact
            } else {
                MatchMethod::Alignment
            },
        };

        if !self.should_replace(result.confidence) {
            // Below threshold: attach metadata for audit, flag for review,
            // leave the displayed text and confidence alone.
            span.quote_match = Some(quote_match);
            span.needs_review = true;
            return Decision::Flag;
        }

        span.text = line.text.clone();
        if line.transliteration.is_some() {
            span.transliteration = line.transliteration.clone();
        }
        span.kind = SpanKind::ScriptureQuote;
        span.confidence = span.confidence.max(result.confidence);
        span.needs_review = result.confidence < AUTO_ACCEPT_THRESHOLD;
        span.quote_match = Some(quote_match);

        Decision::Replace
    }
}

impl Default for Replacer {
    fn default() -> Self {
        Self::new(ReplaceConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
