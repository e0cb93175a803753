//! Gurbani quotation matching core.
//!
//! # Overview
//!
//! This crate takes machine-transcribed fragments of devotional discourse and
//! decides which of them quote the canonical scripture corpus (Sri Guru
//! Granth Sahib, Dasam Granth, Bhai Gurdas, Bhai Nand Lal).  When a match is
//! confident the transcribed text is replaced with the authoritative
//! canonical text — while what was actually spoken is always preserved as
//! provenance.
//!
//! Audio capture, speech recognition, translation, export and transport are
//! upstream/downstream concerns; this core only ever sees text spans with
//! metadata and hands back enriched spans plus audit data.
//!
//! # Architecture
//!
//! ```text
//! span ──▶ CandidateDetector ──▶ Matcher ──────────────▶ Replacer ──▶ span'
//!            (high recall)        │  ErrorNormalizer      (policy)
//!                                 │  ScriptureIndex.search
//!                                 │  AlignmentScorer
//!                                 └─ ranking
//!
//! hypotheses ──▶ Rescorer ◀── CorpusLanguageModel   (orthogonal reranking)
//! ```
//!
//! All operations are synchronous and CPU-bound.  Built models and canonical
//! lines are immutable after construction and safe for unsynchronized
//! concurrent reads; the only guarded resource is the lazily-built language
//! model ([`lm::ModelHandle`], build once then read-only).
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use gurbani_quote::config::CoreConfig;
//! use gurbani_quote::corpus::{CanonicalLine, InMemoryIndex, ScriptureSource};
//! use gurbani_quote::matching::{CandidateDetector, Matcher};
//! use gurbani_quote::pipeline::{Decision, QuotePipeline, Replacer, TranscriptSpan};
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
//! // A span whose recognition noise normalizes back onto the canonical line.
//! let mut span = TranscriptSpan::new(0, 48, "ਹਰਿ ਹਰਿ ਨਾਮੁੁ ਜਪਹੁ", 0.6);
//! let audit = pipeline.process(&mut span, true, None, None);
//!
//! assert_eq!(audit.decision, Decision::Replace);
//! assert_eq!(span.text, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ");
//! assert_eq!(span.spoken_text(), "ਹਰਿ ਹਰਿ ਨਾਮੁੁ ਜਪਹੁ");
//! ```

pub mod config;
pub mod corpus;
pub mod lm;
pub mod matching;
pub mod pipeline;
pub mod rescore;
pub mod text;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use config::CoreConfig;
pub use corpus::{CanonicalLine, InMemoryIndex, IndexError, ScriptureIndex, ScriptureSource};
pub use lm::{LanguageModel, ModelHandle, ModelStore};
pub use matching::{AlignmentResult, CandidateDetector, Matcher};
pub use pipeline::{Decision, QuotePipeline, Replacer, SpanAudit, TranscriptSpan};
pub use rescore::{RescoredHypothesis, Rescorer};
