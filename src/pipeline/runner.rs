//! Pipeline orchestrator — drives detect → match → decide for one span.
//!
//! # Pipeline flow
//!
//! ```text
//! TranscriptSpan
//!   └─▶ CandidateDetector.detect_candidates          [Detected]
//!         ├─ none   → Decided(reject) → Final
//!         └─ best candidate text
//!              └─▶ Matcher.find_best_alignment       [Matched]
//!                    ├─ none   → Decided(reject) → Final
//!                    └─ result → Replacer.apply → Decided(replace|flag) → Final
//! ```
//!
//! Everything is synchronous and CPU-bound; external failures inside the
//! matcher degrade to a reject decision, so [`QuotePipeline::process`]
//! always returns an audit and never fails a span.

use serde::Serialize;

use crate::corpus::ScriptureSource;
use crate::matching::{AlignmentResult, CandidateDetector, Matcher};
use crate::pipeline::replace::Replacer;
use crate::pipeline::span::TranscriptSpan;
use crate::pipeline::state::{Decision, SpanPhase};

// ---------------------------------------------------------------------------
// SpanAudit
// ---------------------------------------------------------------------------

/// Serializable record of one span's trip through the pipeline, handed to
/// the downstream consumer alongside the (possibly enriched) span.
#[derive(Debug, Clone, Serialize)]
pub struct SpanAudit {
    /// Phase labels in the order they were entered.
    pub phases: Vec<&'static str>,
    /// The final policy decision.
    pub decision: Decision,
    /// How many quote candidates the detector produced.
    pub candidate_count: usize,
    /// The best alignment, when one was found (present even for a flag
    /// decision, so reviewers can see why).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<AlignmentResult>,
}

// ---------------------------------------------------------------------------
// QuotePipeline
// ---------------------------------------------------------------------------

/// Owns the three pipeline stages and applies them to spans one at a time.
///
/// The pipeline itself is stateless between spans; it can be shared behind
/// an `Arc` and driven from multiple worker threads on independent spans.
pub struct QuotePipeline {
    detector: CandidateDetector,
    matcher: Matcher,
    replacer: Replacer,
}

impl QuotePipeline {
    /// Assemble a pipeline from its stages.
    pub fn new(detector: CandidateDetector, matcher: Matcher, replacer: Replacer) -> Self {
        Self {
            detector,
            matcher,
            replacer,
        }
    }

    /// Process one span in place and return its audit record.
    ///
    /// * `route_hint` — upstream router's "sounds like scripture" flag.
    /// * `source` — restrict matching to one collection, when known.
    /// * `ang_hint` — opaque locator hint used for candidate re-ranking.
    pub fn process(
        &self,
        span: &mut TranscriptSpan,
        route_hint: bool,
        source: Option<ScriptureSource>,
        ang_hint: Option<&str>,
    ) -> SpanAudit {
        let mut phases = vec![SpanPhase::Detected.label()];

        let candidates = self.detector.detect_candidates(&span.text, route_hint);
        if candidates.is_empty() {
            log::debug!("pipeline: no quote candidates in span {}..{}", span.start, span.end);
            phases.push(SpanPhase::Decided(Decision::Reject).label());
            phases.push(SpanPhase::Final.label());
            return SpanAudit {
                phases,
                decision: Decision::Reject,
                candidate_count: 0,
                alignment: None,
            };
        }

        // Candidates arrive sorted by confidence; the strongest one drives
        // the index query.
        let query = candidates[0].text.clone();
        let alignment = self.matcher.find_best_alignment(&query, None, source, ang_hint);
        phases.push(SpanPhase::Matched.label());

        let decision = match alignment.as_ref() {
            None => Decision::Reject,
            Some(result) => self.replacer.apply(span, result),
        };

        log::debug!(
            "pipeline: span {}..{} decided {:?} over {} candidate(s)",
            span.start,
            span.end,
            decision,
            candidates.len()
        );

        phases.push(SpanPhase::Decided(decision).label());
        phases.push(SpanPhase::Final.label());

        SpanAudit {
            phases,
            decision,
            candidate_count: candidates.len(),
            alignment,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::CoreConfig;
    use crate::corpus::index::FailingIndex;
    use crate::corpus::{CanonicalLine, InMemoryIndex, ScriptureIndex};
    use crate::pipeline::span::SpanKind;

    fn corpus() -> Vec<CanonicalLine> {
        vec![
            CanonicalLine::new(1, "ਸਤਿਗੁਰ ਪ੍ਰਸਾਦਿ", ScriptureSource::Sggs),
            CanonicalLine::new(2, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", ScriptureSource::Sggs),
        ]
    }

    fn pipeline_over(index: Arc<dyn ScriptureIndex>) -> QuotePipeline {
        let config = CoreConfig::default();
        QuotePipeline::new(
            CandidateDetector::new(config.detector.clone()),
            Matcher::new(index, config.matcher.clone()),
            Replacer::new(config.replace.clone()),
        )
    }

    fn pipeline() -> QuotePipeline {
        pipeline_over(Arc::new(InMemoryIndex::from_lines(corpus()).unwrap()))
    }

    // --- happy path ---

    #[test]
    fn exact_quotation_is_replaced_automatically() {
        let p = pipeline();
        let mut span = TranscriptSpan::new(0, 40, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", 0.6);

        let audit = p.process(&mut span, true, None, None);

        assert_eq!(audit.decision, Decision::Replace);
        assert_eq!(span.text, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ");
        assert_eq!(span.kind, SpanKind::ScriptureQuote);
        assert!(!span.needs_review);
        assert_eq!(span.confidence, 1.0);
        assert!(audit.alignment.is_some());
        assert_eq!(audit.phases.last().copied(), Some("final"));
    }

    #[test]
    fn noisy_quotation_is_repaired_to_canonical() {
        let p = pipeline();
        // Doubled matra — typical recognition noise.
        let mut span = TranscriptSpan::new(0, 40, "ਹਰਿ ਹਰਿ ਨਾਮੁੁ ਜਪਹੁ", 0.6);

        let audit = p.process(&mut span, true, None, None);

        assert_eq!(audit.decision, Decision::Replace);
        assert_eq!(span.text, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ");
        assert_eq!(span.spoken_text(), "ਹਰਿ ਹਰਿ ਨਾਮੁੁ ਜਪਹੁ");
    }

    // --- rejection paths ---

    #[test]
    fn ordinary_english_speech_is_left_alone() {
        let p = pipeline();
        let mut span = TranscriptSpan::new(0, 40, "the weather is lovely today isn't it", 0.8);

        let audit = p.process(&mut span, false, None, None);

        assert_eq!(audit.decision, Decision::Reject);
        assert_eq!(audit.candidate_count, 0);
        assert_eq!(span.text, "the weather is lovely today isn't it");
        assert!(span.quote_match.is_none());
        assert!(!span.needs_review);
    }

    #[test]
    fn index_failure_degrades_to_reject() {
        let p = pipeline_over(Arc::new(FailingIndex));
        let mut span = TranscriptSpan::new(0, 40, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", 0.6);

        let audit = p.process(&mut span, true, None, None);

        assert_eq!(audit.decision, Decision::Reject);
        assert!(audit.candidate_count > 0, "detection still ran");
        assert!(audit.alignment.is_none());
        assert_eq!(span.text, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", "span untouched");
    }

    #[test]
    fn unmatched_gurmukhi_speech_is_rejected_without_mutation() {
        let p = pipeline();
        let mut span = TranscriptSpan::new(0, 40, "ਅੱਜ ਮੌਸਮ ਬੜਾ ਚੰਗਾ ਲੱਗਦਾ", 0.8);

        let audit = p.process(&mut span, false, None, None);

        assert_eq!(audit.decision, Decision::Reject);
        assert!(span.quote_match.is_none());
    }

    // --- audit ---

    #[test]
    fn audit_phases_trace_the_state_machine() {
        let p = pipeline();
        let mut span = TranscriptSpan::new(0, 40, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", 0.6);

        let audit = p.process(&mut span, true, None, None);

        assert_eq!(
            audit.phases,
            vec!["detected", "matched", "decided:replace", "final"]
        );
    }

    #[test]
    fn audit_serializes_to_json() {
        let p = pipeline();
        let mut span = TranscriptSpan::new(0, 40, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", 0.6);

        let audit = p.process(&mut span, true, None, None);
        let json = serde_json::to_string(&audit).unwrap();

        assert!(json.contains("decided:replace") || json.contains("Replace"));
        assert!(json.contains("combined_score"));
    }
}
