//! Per-span processing state machine.
//!
//! Every span moves through the same four phases:
//!
//! ```text
//! Detected ──match found / none──▶ Matched
//! Matched  ──policy applied─────▶ Decided(Replace | Flag | Reject)
//! Decided  ──────────────────────▶ Final
//! ```
//!
//! `Final` is terminal — there are no retries or loops.  External failures
//! (index down, malformed records) degrade to `Decided(Reject)` rather than
//! propagating; a rejected span simply keeps its transcribed text.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Outcome of the replacement policy for one span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    /// The displayed text was replaced with the canonical text.
    Replace,
    /// Match metadata was attached but the text was left alone.
    Flag,
    /// No usable match; the span is untouched.
    Reject,
}

// ---------------------------------------------------------------------------
// SpanPhase
// ---------------------------------------------------------------------------

/// Phases of span processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpanPhase {
    /// Candidate detection has run.
    Detected,
    /// Matching (or its failure downgrade) has run.
    Matched,
    /// The replacement policy has produced a decision.
    Decided(Decision),
    /// Processing is complete; the span will not change again.
    Final,
}

impl SpanPhase {
    /// Returns `true` once the span can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SpanPhase::Final)
    }

    /// A short human-readable label suitable for logs and audit records.
    pub fn label(&self) -> &'static str {
        match self {
            SpanPhase::Detected => "detected",
            SpanPhase::Matched => "matched",
            SpanPhase::Decided(Decision::Replace) => "decided:replace",
            SpanPhase::Decided(Decision::Flag) => "decided:flag",
            SpanPhase::Decided(Decision::Reject) => "decided:reject",
            SpanPhase::Final => "final",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
