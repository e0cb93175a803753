//! Span pipeline: data model, state machine, replacement policy, orchestration.
//!
//! This module provides:
//! * [`TranscriptSpan`] / [`QuoteMatch`] — the span data model with
//!   preserved provenance.
//! * [`SpanPhase`] / [`Decision`] — the per-span state machine.
//! * [`Replacer`] — the layered confidence decision policy.
//! * [`QuotePipeline`] / [`SpanAudit`] — the detect → match → decide driver.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use gurbani_quote::config::CoreConfig;
//! use gurbani_quote::corpus::{CanonicalLine, InMemoryIndex, ScriptureSource};
//! use gurbani_quote::matching::{CandidateDetector, Matcher};
//! use gurbani_quote::pipeline::{QuotePipeline, Replacer, TranscriptSpan};
//!
//! let config = CoreConfig::default();
//! let index = InMemoryIndex::from_lines(vec![
//!     CanonicalLine::new(1, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", ScriptureSource::Sggs),
//! ])
//! .unwrap();
//!
//! let pipeline = QuotePipeline::new(
//!     CandidateDetector::new(config.detector.clone()),
//!     Matcher::new(Arc::new(index), config.matcher.clone()),
//!     Replacer::new(config.replace.clone()),
//! );
//!
//! let mut span = TranscriptSpan::new(0, 40, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", 0.6);
//! let audit = pipeline.process(&mut span, true, None, None);
//! assert!(audit.alignment.is_some());
//! ```

pub mod replace;
pub mod runner;
pub mod span;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use replace::{Replacer, AUTO_ACCEPT_THRESHOLD};
pub use runner::{QuotePipeline, SpanAudit};
pub use span::{MatchMethod, QuoteMatch, SpanKind, TranscriptSpan};
pub use state::{Decision, SpanPhase};
