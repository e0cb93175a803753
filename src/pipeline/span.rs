//! The transcript span data model and its quotation metadata.
//!
//! A [`TranscriptSpan`] is the unit handed to this core by the upstream
//! recognizer and handed back, possibly enriched, to the downstream
//! consumer.  [`QuoteMatch`] is the finalized record attached once a
//! replacement decision has been made; its `spoken_text` field preserves
//! what was actually said and is set at most once, never cleared.

use serde::{Deserialize, Serialize};

use crate::corpus::ScriptureSource;

// ---------------------------------------------------------------------------
// SpanKind
// ---------------------------------------------------------------------------

/// What a span holds after processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanKind {
    /// Ordinary transcribed speech.
    Speech,
    /// A recognized scripture quotation (text replaced by canonical form).
    ScriptureQuote,
}

impl Default for SpanKind {
    fn default() -> Self {
        SpanKind::Speech
    }
}

// ---------------------------------------------------------------------------
// MatchMethod
// ---------------------------------------------------------------------------

/// How a quote match was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMethod {
    /// The normalized query was character-identical to the canonical line.
    Exact,
    /// Edit-distance + token-overlap alignment.
    Alignment,
}

// ---------------------------------------------------------------------------
// QuoteMatch
// ---------------------------------------------------------------------------

/// Finalized quotation record attached to a span.
///
/// Created once per decision; superseded only by an explicit re-run, in
/// which case `spoken_text` is carried over rather than recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteMatch {
    /// Collection the canonical line belongs to.
    pub source: ScriptureSource,
    /// Identifier of the canonical line.
    pub line_id: u64,
    /// The authoritative text.
    pub canonical_text: String,
    /// What was actually spoken — preserved verbatim, set exactly once.
    pub spoken_text: String,
    /// Confidence of the match at decision time.
    pub confidence: f32,
    /// How the match was established.
    pub match_method: MatchMethod,
}

// ---------------------------------------------------------------------------
// TranscriptSpan
// ---------------------------------------------------------------------------

/// One contiguous portion of transcribed content under analysis.
///
/// Offsets are byte positions into the parent transcript.  `confidence`
/// starts as the recognizer's value and is only ever raised by a
/// higher-confidence match, never lowered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSpan {
    pub start: usize,
    pub end: usize,
    /// Displayed text — canonical after a confident replacement.
    pub text: String,
    /// Roman transliteration, set alongside a canonical replacement when the
    /// reference line carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
    pub kind: SpanKind,
    pub confidence: f32,
    /// Set whenever a human should look at the decision.
    pub needs_review: bool,
    /// The attached quotation record, when a match was decided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_match: Option<QuoteMatch>,
}

impl TranscriptSpan {
    /// Create a plain speech span with no quotation metadata.
    pub fn new(start: usize, end: usize, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            transliteration: None,
            kind: SpanKind::Speech,
            confidence,
            needs_review: false,
            quote_match: None,
        }
    }

    /// The text as originally spoken: the preserved `spoken_text` when a
    /// match was attached, the displayed text otherwise.
    pub fn spoken_text(&self) -> &str {
        self.quote_match
            .as_ref()
            .map(|m| m.spoken_text.as_str())
            .unwrap_or(&self.text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
