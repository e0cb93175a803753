//! Quote matching: detection, alignment scoring, and ranking.
//!
//! This module provides:
//! * [`CandidateDetector`] — high-recall detection of quote-like spans.
//! * [`AlignmentScorer`] / [`AlignmentResult`] — pure edit-distance +
//!   token-overlap scoring against one canonical line.
//! * [`Matcher`] / [`MatchOutcome`] — index lookup, ranking, and the
//!   carry-forward decision.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use gurbani_quote::config::MatcherConfig;
//! use gurbani_quote::corpus::{CanonicalLine, InMemoryIndex, ScriptureSource};
//! use gurbani_quote::matching::Matcher;
//!
//! let index = InMemoryIndex::from_lines(vec![
//!     CanonicalLine::new(1, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", ScriptureSource::Sggs),
//! ])
//! .unwrap();
//!
//! let matcher = Matcher::new(Arc::new(index), MatcherConfig::default());
//! let outcome = matcher.match_and_align("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", None, None, None);
//! assert_eq!(outcome.text, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ");
//! assert!(outcome.result.is_some());
//! ```

pub mod align;
pub mod detect;
pub mod matcher;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use align::{edit_ratio, levenshtein, token_overlap, AlignmentResult, AlignmentScorer};
pub use detect::{Candidate, CandidateDetector, DetectReason};
pub use matcher::{MatchOutcome, Matcher, MIN_RETURN_SCORE};
