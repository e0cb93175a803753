//! High-recall detection of quote-like spans.
//!
//! # Overview
//!
//! [`CandidateDetector`] scans a transcribed span and emits [`Candidate`]s —
//! sub-spans that *might* be scripture quotations.  It is deliberately
//! permissive: false positives are cheap because the matcher filters them
//! against the reference corpus later, while a missed candidate is a missed
//! quotation.
//!
//! Four signals fire independently:
//!
//! | # | Signal | Confidence |
//! |---|--------|------------|
//! | 1 | Upstream route hint, optionally with quote-shaped text | 0.70 / 0.85 |
//! | 2 | Known introductory phrase ("ਗੁਰਬਾਣੀ ਦਾ ਫੁਰਮਾਨ ਹੈ", …) | 0.75 |
//! | 3 | Scripture-register vocabulary density ≥ 0.30 | 0.60 – 0.90 |
//! | 4 | Word-count window fallback (no other signal fired) | 0.40 |
//!
//! Candidates are de-duplicated on `(start, end, text)` keeping the
//! highest-confidence occurrence.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::DetectorConfig;
use crate::text::{gurmukhi_alnum_ratio, word_tokens};

// ---------------------------------------------------------------------------
// Static signal tables
// ---------------------------------------------------------------------------

/// Phrases a speaker uses to introduce a quotation.  Roman patterns are
/// case-insensitive; Gurmukhi has no case.
const INTRO_PATTERNS: [&str; 7] = [
    r"(?i)\bas (it is )?(said|written) in (the )?(guru granth sahib|granth|gurbani|bani)\b",
    r"(?i)\bgurbani (says|states|tells us)\b",
    r"(?i)\b(guru|maharaj) sahib (ji )?(says|said|farmaunde)\b",
    r"ਗੁਰਬਾਣੀ (ਦਾ )?[ਫਫ਼]ੁਰਮਾਨ ਹੈ",
    r"[ਫਫ਼]ੁਰਮਾਉਂਦੇ ਹਨ",
    r"ਮਹਾਰਾਜ ਕਹਿੰਦੇ (ਹਨ|ਨੇ)",
    r"ਬਾਣੀ ਵਿਚ (ਆਉਂਦਾ|ਲਿਖਿਆ) ਹੈ",
];

static INTRO_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    INTRO_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("static intro pattern"))
        .collect()
});

/// Words of the scripture register — high-frequency Gurbani vocabulary that
/// rarely appears in conversational Punjabi at density.
const REGISTER_WORDS: [&str; 36] = [
    "ਵਾਹਿਗੁਰੂ", "ਸਤਿਗੁਰ", "ਸਤਿਗੁਰੁ", "ਨਾਨਕ", "ਹਰਿ", "ਪ੍ਰਭ", "ਪ੍ਰਭੁ", "ਗੁਰ", "ਗੁਰੁ",
    "ਨਾਮੁ", "ਨਾਮ", "ਸਾਹਿਬ", "ਸਾਹਿਬੁ", "ਜਪੁ", "ਜਪਿ", "ਸਿਮਰਿ", "ਸਬਦੁ", "ਸਬਦਿ", "ਸੰਤ",
    "ਭਗਤ", "ਕਿਰਪਾ", "ਅਕਾਲ", "ਪੁਰਖੁ", "ਸਚੁ", "ਸਚਾ", "ਨਿਰਭਉ", "ਨਿਰਵੈਰੁ", "ਕਰਤਾ",
    "ਮਾਇਆ", "ਸੰਗਤਿ", "ਸੇਵਾ", "ਸਿਮਰਨ", "ਬਾਣੀ", "ਸਤਿ", "ਪ੍ਰਸਾਦਿ", "ਮੁਕਤਿ",
];

static REGISTER_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| REGISTER_WORDS.iter().copied().collect());

/// Window (in words) within which a repeated word counts as quote shape.
const REPEAT_WINDOW: usize = 15;

// ---------------------------------------------------------------------------
// Candidate
// ---------------------------------------------------------------------------

/// Why a candidate was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectReason {
    /// Upstream routing marked the span as scripture-like.
    RouteHint,
    /// The span itself looks like a quotation (script density + repetition).
    QuoteShape,
    /// A known introductory phrase preceded the span.
    IntroPhrase,
    /// Scripture-register vocabulary density was high.
    VocabularyRatio,
    /// Plain word-count fallback; nothing else fired.
    WordWindow,
}

/// An ephemeral quote-candidate sub-span.  Offsets are byte positions into
/// the original input text, `start < end`, confidence in `[0, 1]`.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub confidence: f32,
    pub reasons: Vec<DetectReason>,
}

// ---------------------------------------------------------------------------
// CandidateDetector
// ---------------------------------------------------------------------------

/// Multi-signal candidate detector.
///
/// # Example
///
/// ```
/// use gurbani_quote::config::DetectorConfig;
/// use gurbani_quote::matching::CandidateDetector;
///
/// let detector = CandidateDetector::new(DetectorConfig::default());
/// let candidates = detector.detect_candidates("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ ਨਿਤ ਨਾਮੁ", true);
/// assert!(!candidates.is_empty());
/// ```
pub struct CandidateDetector {
    config: DetectorConfig,
}

impl CandidateDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Detect quote candidates in `text`.
    ///
    /// `route_hint` is the upstream router's "this sounds like scripture"
    /// flag.  Empty or whitespace-only input yields an empty list.  The
    /// returned candidates are sorted by confidence, highest first, and
    /// de-duplicated on `(start, end, text)`.
    pub fn detect_candidates(&self, text: &str, route_hint: bool) -> Vec<Candidate> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let span_start = text.len() - text.trim_start().len();
        let span_end = text.trim_end().len();
        let words: Vec<&str> = trimmed.split_whitespace().collect();
        let gurmukhi_words = word_tokens(trimmed);

        let mut candidates = Vec::new();

        // ── Signal 1: upstream route hint ────────────────────────────────
        if route_hint {
            let mut confidence = 0.70;
            let mut reasons = vec![DetectReason::RouteHint];
            if gurmukhi_alnum_ratio(trimmed) >= 0.5 && has_nearby_repeat(&words, REPEAT_WINDOW) {
                confidence = 0.85;
                reasons.push(DetectReason::QuoteShape);
            }
            candidates.push(Candidate {
                start: span_start,
                end: span_end,
                text: trimmed.to_string(),
                confidence,
                reasons,
            });
        }

        // ── Signal 2: introductory phrases ───────────────────────────────
        for pattern in INTRO_PHRASES.iter() {
            for m in pattern.find_iter(text) {
                let tail = &text[m.end()..];
                let tail_start = m.end() + (tail.len() - tail.trim_start().len());
                if tail_start < span_end {
                    candidates.push(Candidate {
                        start: tail_start,
                        end: span_end,
                        text: text[tail_start..span_end].to_string(),
                        confidence: 0.75,
                        reasons: vec![DetectReason::IntroPhrase],
                    });
                }
            }
        }

        // ── Signal 3: scripture-register vocabulary density ──────────────
        if !gurmukhi_words.is_empty() {
            let known = gurmukhi_words
                .iter()
                .filter(|w| REGISTER_SET.contains(w.as_str()))
                .count();
            let ratio = known as f32 / gurmukhi_words.len() as f32;
            if ratio >= 0.30 {
                candidates.push(Candidate {
                    start: span_start,
                    end: span_end,
                    text: trimmed.to_string(),
                    confidence: (0.60 + ratio * 0.30).min(0.90),
                    reasons: vec![DetectReason::VocabularyRatio],
                });
            }
        }

        // ── Signal 4: word-count window fallback ─────────────────────────
        // Only meaningful when the span carries canonical-script content;
        // plain non-Gurmukhi speech is never a quote candidate.
        if candidates.is_empty()
            && !gurmukhi_words.is_empty()
            && (self.config.min_words..=self.config.max_words).contains(&words.len())
        {
            candidates.push(Candidate {
                start: span_start,
                end: span_end,
                text: trimmed.to_string(),
                confidence: 0.40,
                reasons: vec![DetectReason::WordWindow],
            });
        }

        dedup_by_confidence(candidates)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Returns `true` when some word occurs twice within `window` words.
fn has_nearby_repeat(words: &[&str], window: usize) -> bool {
    for (i, w) in words.iter().enumerate() {
        let limit = (i + window).min(words.len());
        if words[i + 1..limit].contains(w) {
            return true;
        }
    }
    false
}

/// Stable sort by confidence descending, then keep the first occurrence per
/// unique `(start, end, text)` key.
fn dedup_by_confidence(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen: HashSet<(usize, usize, String)> = HashSet::new();
    candidates.retain(|c| seen.insert((c.start, c.end, c.text.clone())));
    candidates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
