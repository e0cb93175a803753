//! Additively-smoothed N-gram language model over the canonical corpus.
//!
//! # Overview
//!
//! [`LanguageModel::build`] consumes raw corpus lines and produces a
//! read-only model: n-gram counts, context counts and a vocabulary.  Each
//! line is padded independently with `order-1` start markers and one end
//! marker, so no n-gram ever spans two unrelated scripture lines.
//!
//! Probabilities use additive (Laplace) smoothing:
//!
//! ```text
//! P(w | context) = (count(ngram) + α) / (count(context) + α·|V|)
//! ```
//!
//! With `α > 0` and a non-empty vocabulary this is strictly positive for
//! every n-gram, seen or unseen — downstream scoring can take logarithms
//! unconditionally.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::text::{char_tokens, word_tokens};

// ---------------------------------------------------------------------------
// Markers and versioning
// ---------------------------------------------------------------------------

/// Start-of-line padding marker (never part of the predicted vocabulary).
pub const START_TOKEN: &str = "<s>";

/// End-of-line marker; part of the vocabulary since the model predicts it.
pub const END_TOKEN: &str = "</s>";

/// Bumped whenever the build procedure changes shape; artifacts carrying a
/// different version are rebuilt rather than served.
pub const MODEL_BUILD_VERSION: &str = "ngram-1";

// ---------------------------------------------------------------------------
// LanguageModel
// ---------------------------------------------------------------------------

/// A built, read-only n-gram model.
///
/// Construction happens once in batch ([`build`](Self::build) /
/// [`build_chars`](Self::build_chars)); after that every method takes `&self`
/// and the model is safe for unsynchronized concurrent reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageModel {
    order: usize,
    ngram_counts: HashMap<String, u32>,
    context_counts: HashMap<String, u32>,
    vocabulary: HashSet<String>,
    total_tokens: u64,
    smoothing_alpha: f64,
    line_count: usize,
    word_count: u64,
    build_version: String,
}

impl LanguageModel {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Build a word-level model of the given `order` over `lines`.
    ///
    /// Lines that contain no Gurmukhi word tokens are skipped.  `order` is
    /// clamped to at least 1; `alpha` must be positive for the positive-
    /// probability guarantee to hold.
    pub fn build<'a, I>(lines: I, order: usize, alpha: f64) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::build_with(lines, order, alpha, word_tokens)
    }

    /// Build a character-level model (tokens are single non-whitespace
    /// codepoints).
    pub fn build_chars<'a, I>(lines: I, order: usize, alpha: f64) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::build_with(lines, order, alpha, char_tokens)
    }

    fn build_with<'a, I>(lines: I, order: usize, alpha: f64, tokenize: fn(&str) -> Vec<String>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let order = order.max(1);

        let mut ngram_counts: HashMap<String, u32> = HashMap::new();
        let mut context_counts: HashMap<String, u32> = HashMap::new();
        let mut vocabulary: HashSet<String> = HashSet::new();
        let mut total_tokens: u64 = 0;
        let mut word_count: u64 = 0;
        let mut line_count = 0usize;

        for line in lines {
            let tokens = tokenize(line);
            if tokens.is_empty() {
                continue;
            }
            line_count += 1;
            word_count += tokens.len() as u64;

            for t in &tokens {
                vocabulary.insert(t.clone());
            }
            vocabulary.insert(END_TOKEN.to_string());

            let padded = pad(&tokens, order);
            total_tokens += padded.len() as u64;

            for window in padded.windows(order) {
                *ngram_counts.entry(window.join(" ")).or_insert(0) += 1;
                *context_counts
                    .entry(window[..order - 1].join(" "))
                    .or_insert(0) += 1;
            }
        }

        log::debug!(
            "lm: built order-{order} model — {line_count} lines, {} vocab, {} ngrams",
            vocabulary.len(),
            ngram_counts.len()
        );

        Self {
            order,
            ngram_counts,
            context_counts,
            vocabulary,
            total_tokens,
            smoothing_alpha: alpha,
            line_count,
            word_count,
            build_version: MODEL_BUILD_VERSION.to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Scoring
    // -----------------------------------------------------------------------

    /// Smoothed probability of one n-gram, in `(0, 1]`.
    ///
    /// The last element is the predicted token; everything before it is the
    /// context.  Unseen n-grams and unseen contexts get the additive floor
    /// `α / (count(context) + α·|V|)` rather than zero.
    pub fn probability(&self, ngram: &[&str]) -> f64 {
        let key = ngram.join(" ");
        let context_key = ngram[..ngram.len().saturating_sub(1)].join(" ");

        let ngram_count = *self.ngram_counts.get(&key).unwrap_or(&0) as f64;
        let context_count = *self.context_counts.get(&context_key).unwrap_or(&0) as f64;

        let vocab_size = self.vocabulary.len().max(1) as f64;
        (ngram_count + self.smoothing_alpha)
            / (context_count + self.smoothing_alpha * vocab_size)
    }

    /// Sum of natural-log probabilities over the sliding window of the
    /// padded token sequence.
    ///
    /// Returns `0.0` for sequences shorter than the model order — too short
    /// to score meaningfully.
    pub fn score_sequence(&self, tokens: &[String]) -> f64 {
        if tokens.len() < self.order {
            return 0.0;
        }

        let padded = pad(tokens, self.order);
        padded
            .windows(self.order)
            .map(|w| {
                let ngram: Vec<&str> = w.iter().map(String::as_str).collect();
                self.probability(&ngram).ln()
            })
            .sum()
    }

    /// Perplexity of `tokens` under the model: `exp(-logP / (len + 1))`.
    ///
    /// Lower is better; text drawn from the corpus register scores far lower
    /// than ordinary speech.
    pub fn perplexity(&self, tokens: &[String]) -> f64 {
        let log_prob = self.score_sequence(tokens);
        (-log_prob / (tokens.len() as f64 + 1.0)).exp()
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// N-gram order of the model.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of distinct tokens (including the end marker).
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of corpus lines that contributed tokens.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Number of word tokens seen, excluding padding markers.
    pub fn word_count(&self) -> u64 {
        self.word_count
    }

    /// Number of tokens including padding markers.
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Smoothing constant the model was built with.
    pub fn smoothing_alpha(&self) -> f64 {
        self.smoothing_alpha
    }

    /// Build-procedure version stamped into the artifact.
    pub fn build_version(&self) -> &str {
        &self.build_version
    }
}

/// Pad one line's tokens: `order-1` start markers, the tokens, one end marker.
fn pad(tokens: &[String], order: usize) -> Vec<String> {
    let mut padded = Vec::with_capacity(tokens.len() + order);
    for _ in 0..order.saturating_sub(1) {
        padded.push(START_TOKEN.to_string());
    }
    padded.extend(tokens.iter().cloned());
    padded.push(END_TOKEN.to_string());
    padded
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "ਸਤਿਗੁਰ ਪ੍ਰਸਾਦਿ",
            "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ",
            "ਹਰਿ ਨਾਮੁ ਧਿਆਇ",
            "ਨਾਨਕ ਨਾਮੁ ਚੜ੍ਹਦੀ ਕਲਾ",
        ]
    }

    fn model() -> LanguageModel {
        LanguageModel::build(corpus(), 3, 0.01)
    }

    fn toks(s: &str) -> Vec<String> {
        crate::text::word_tokens(s)
    }

    // --- build ---

    #[test]
    fn build_counts_lines_and_words() {
        let m = model();
        assert_eq!(m.line_count(), 4);
        assert_eq!(m.word_count(), 2 + 4 + 3 + 4);
        assert_eq!(m.order(), 3);
    }

    #[test]
    fn vocabulary_contains_end_marker_but_not_start() {
        let m = model();
        assert!(m.vocabulary.contains(END_TOKEN));
        assert!(!m.vocabulary.contains(START_TOKEN));
    }

    #[test]
    fn lines_without_gurmukhi_are_skipped() {
        let m = LanguageModel::build(vec!["hello world", "ਹਰਿ ਨਾਮੁ"], 2, 0.01);
        assert_eq!(m.line_count(), 1);
    }

    #[test]
    fn order_zero_is_clamped_to_one() {
        let m = LanguageModel::build(corpus(), 0, 0.01);
        assert_eq!(m.order(), 1);
    }

    // --- probability ---

    #[test]
    fn probability_is_positive_for_seen_ngrams() {
        let m = model();
        let p = m.probability(&[START_TOKEN, START_TOKEN, "ਹਰਿ"]);
        assert!(p > 0.0 && p <= 1.0, "p = {p}");
    }

    #[test]
    fn probability_is_positive_for_unseen_ngrams() {
        let m = model();
        let p = m.probability(&["ਜੰਗਲ", "ਵਿਚ", "ਮੋਰ"]);
        assert!(p > 0.0 && p <= 1.0, "p = {p}");
    }

    #[test]
    fn seen_ngram_outscores_unseen_in_same_context() {
        let m = model();
        // After "<s> <s>", "ਹਰਿ" occurs twice in the corpus; "ਮੋਰ" never.
        let seen = m.probability(&[START_TOKEN, START_TOKEN, "ਹਰਿ"]);
        let unseen = m.probability(&[START_TOKEN, START_TOKEN, "ਮੋਰ"]);
        assert!(seen > unseen, "seen {seen} <= unseen {unseen}");
    }

    #[test]
    fn probabilities_stay_in_unit_interval_on_empty_model() {
        let m = LanguageModel::build(Vec::<&str>::new(), 3, 0.01);
        let p = m.probability(&["ਕ", "ਖ", "ਗ"]);
        assert!(p > 0.0 && p <= 1.0, "p = {p}");
    }

    // --- score_sequence ---

    #[test]
    fn short_sequence_scores_zero() {
        let m = model();
        assert_eq!(m.score_sequence(&toks("ਹਰਿ ਨਾਮੁ")), 0.0);
        assert_eq!(m.score_sequence(&[]), 0.0);
    }

    #[test]
    fn corpus_sentence_scores_higher_than_junk() {
        let m = model();
        let good = m.score_sequence(&toks("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ"));
        let junk = m.score_sequence(&toks("ਜੰਗਲ ਮੋਰ ਪਹਾੜ ਦਰਿਆ"));
        assert!(good > junk, "good {good} <= junk {junk}");
    }

    #[test]
    fn log_scores_are_negative() {
        let m = model();
        let score = m.score_sequence(&toks("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ"));
        assert!(score < 0.0);
    }

    // --- perplexity ---

    #[test]
    fn corpus_sentence_has_lower_perplexity_than_junk() {
        let m = model();
        let good = m.perplexity(&toks("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ"));
        let junk = m.perplexity(&toks("ਜੰਗਲ ਮੋਰ ਪਹਾੜ ਦਰਿਆ"));
        assert!(good < junk, "good {good} >= junk {junk}");
    }

    // --- char model ---

    #[test]
    fn char_model_builds_and_scores() {
        let m = LanguageModel::build_chars(corpus(), 4, 0.01);
        let chars = crate::text::char_tokens("ਹਰਿ ਨਾਮੁ");
        let score = m.score_sequence(&chars);
        assert!(score < 0.0);
    }

    // --- serialization ---

    #[test]
    fn model_round_trips_through_json() {
        let m = model();
        let json = serde_json::to_string(&m).unwrap();
        let back: LanguageModel = serde_json::from_str(&json).unwrap();

        assert_eq!(back.order(), m.order());
        assert_eq!(back.vocabulary_size(), m.vocabulary_size());
        assert_eq!(back.word_count(), m.word_count());

        let seq = toks("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ");
        assert_eq!(back.score_sequence(&seq), m.score_sequence(&seq));
    }
}
