//! LM-based reranking of recognizer hypotheses.
//!
//! # Overview
//!
//! [`Rescorer`] runs orthogonally to the replacement pipeline: given the
//! recognizer's n-best hypothesis list it blends each acoustic confidence
//! with a corpus language-model score,
//!
//! ```text
//! combined = (1 - w) · asr_confidence + w · sigmoid(lm_score / 100)
//! ```
//!
//! and re-sorts the list.  Rescoring only applies to hypotheses that are
//! mostly Gurmukhi ([`Rescorer::should_rescore`]) and only when the language
//! model is actually loaded — an unloaded model degrades to "no rescoring",
//! never to an error.
//!
//! [`Rescorer::boost_if_canonical_fit`] is a separate, coarser signal: a
//! perplexity-banded confidence boost for hypotheses that read like corpus
//! text.

use std::sync::Arc;

use serde::Serialize;

use crate::config::RescoreConfig;
use crate::lm::ModelHandle;
use crate::text::{gurmukhi_ratio, word_tokens};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Divisor mapping unbounded negative log-probabilities into sigmoid range.
const LM_SCORE_SCALE: f64 = 100.0;

// ---------------------------------------------------------------------------
// RescoredHypothesis
// ---------------------------------------------------------------------------

/// One hypothesis with its blended score, serializable for audit.
#[derive(Debug, Clone, Serialize)]
pub struct RescoredHypothesis {
    pub text: String,
    /// The recognizer's confidence, carried through unchanged.
    pub asr_score: f32,
    /// Raw LM log-probability (0.0 when the hypothesis was not rescored).
    pub lm_score: f64,
    /// The interpolated ranking score.
    pub combined_score: f32,
    /// Perplexity under the model (0.0 when the model is not loaded).
    pub perplexity: f64,
}

// ---------------------------------------------------------------------------
// Rescorer
// ---------------------------------------------------------------------------

/// Blends acoustic and language-model evidence over hypothesis lists.
pub struct Rescorer {
    model: Arc<ModelHandle>,
    config: RescoreConfig,
}

impl Rescorer {
    /// Create a rescorer over an injected model handle.
    ///
    /// The handle may be unloaded; every operation then degrades to a
    /// pass-through of the acoustic scores.
    pub fn new(model: Arc<ModelHandle>, config: RescoreConfig) -> Self {
        Self { model, config }
    }

    /// Whether `text` qualifies for LM rescoring: its Gurmukhi character
    /// ratio (ignoring whitespace) reaches the configured minimum and the
    /// model is loaded.
    pub fn should_rescore(&self, text: &str) -> bool {
        self.model.is_loaded() && gurmukhi_ratio(text) >= self.config.min_script_ratio
    }

    /// Rescore a single hypothesis.
    pub fn rescore_hypothesis(&self, text: &str, asr_confidence: f32) -> RescoredHypothesis {
        let tokens = word_tokens(text);

        let lm_score = if self.should_rescore(text) {
            // should_rescore guarantees the model is loaded here.
            self.model
                .get()
                .map(|m| m.score_sequence(&tokens))
                .unwrap_or(0.0)
        } else {
            0.0
        };

        let normalized_lm = sigmoid(lm_score / LM_SCORE_SCALE) as f32;
        let w = self.config.weight;
        let combined = (1.0 - w) * asr_confidence + w * normalized_lm;

        let perplexity = self
            .model
            .get()
            .map(|m| m.perplexity(&tokens))
            .unwrap_or(0.0);

        RescoredHypothesis {
            text: text.to_string(),
            asr_score: asr_confidence,
            lm_score,
            combined_score: combined,
            perplexity,
        }
    }

    /// Rescore an n-best list and sort it by combined score, best first.
    ///
    /// `confidences` pairs with `hypotheses` by position; missing entries
    /// default to 0.5.  The sort is stable, so ties keep the recognizer's
    /// original order.
    pub fn rescore(
        &self,
        hypotheses: &[String],
        confidences: Option<&[f32]>,
    ) -> Vec<RescoredHypothesis> {
        let mut rescored: Vec<RescoredHypothesis> = hypotheses
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let confidence = confidences
                    .and_then(|c| c.get(i))
                    .copied()
                    .unwrap_or(0.5);
                self.rescore_hypothesis(text, confidence)
            })
            .collect();

        rescored.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        rescored
    }

    /// Perplexity-banded confidence boost for corpus-like hypotheses.
    ///
    /// | Perplexity | Boost |
    /// |------------|-------|
    /// | `< 50`  | `boost_factor` |
    /// | `< 100` | `boost_factor / 2` |
    /// | `< 200` | `boost_factor / 4` |
    /// | else    | none |
    ///
    /// The result never exceeds 1.0.  Hypotheses that do not qualify for
    /// rescoring come back unchanged.
    pub fn boost_if_canonical_fit(&self, text: &str, confidence: f32, boost_factor: f32) -> f32 {
        if !self.should_rescore(text) {
            return confidence;
        }

        let tokens = word_tokens(text);
        let perplexity = match self.model.get() {
            Some(model) => model.perplexity(&tokens),
            None => return confidence,
        };

        (confidence + perplexity_boost(perplexity, boost_factor)).min(1.0)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Standard logistic function.
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Banded boost amount for a given perplexity.
fn perplexity_boost(perplexity: f64, boost_factor: f32) -> f32 {
    if perplexity < 50.0 {
        boost_factor
    } else if perplexity < 100.0 {
        boost_factor / 2.0
    } else if perplexity < 200.0 {
        boost_factor / 4.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lm::ModelStore;
    use tempfile::tempdir;

    fn corpus_lines() -> Vec<String> {
        vec![
            "ਸਤਿਗੁਰ ਪ੍ਰਸਾਦਿ".to_string(),
            "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ".to_string(),
            "ਹਰਿ ਨਾਮੁ ਧਿਆਇ".to_string(),
            "ਨਾਨਕ ਨਾਮੁ ਚੜ੍ਹਦੀ ਕਲਾ".to_string(),
        ]
    }

    /// A rescorer whose model is built; the temp dir must outlive it.
    fn loaded_rescorer(weight: f32) -> (Rescorer, tempfile::TempDir) {
        let dir = tempdir().expect("temp dir");
        let handle = Arc::new(ModelHandle::new(ModelStore::new(
            dir.path().join("lm-word.json"),
        )));
        handle.get_or_build(3, 0.01, corpus_lines);

        let config = RescoreConfig {
            weight,
            ..RescoreConfig::default()
        };
        (Rescorer::new(handle, config), dir)
    }

    fn unloaded_rescorer() -> (Rescorer, tempfile::TempDir) {
        let dir = tempdir().expect("temp dir");
        let handle = Arc::new(ModelHandle::new(ModelStore::new(
            dir.path().join("lm-word.json"),
        )));
        (Rescorer::new(handle, RescoreConfig::default()), dir)
    }

    // --- should_rescore ---

    #[test]
    fn unloaded_model_never_rescores() {
        let (r, _dir) = unloaded_rescorer();
        assert!(!r.should_rescore("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ"));
    }

    #[test]
    fn low_script_ratio_never_rescores() {
        let (r, _dir) = loaded_rescorer(0.3);
        assert!(!r.should_rescore("mostly english with one ਹਰਿ word in it"));
        assert!(!r.should_rescore(""));
    }

    #[test]
    fn gurmukhi_text_with_loaded_model_rescores() {
        let (r, _dir) = loaded_rescorer(0.3);
        assert!(r.should_rescore("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ"));
    }

    // --- rescore_hypothesis ---

    #[test]
    fn unqualified_hypothesis_gets_zero_lm_score() {
        let (r, _dir) = loaded_rescorer(0.3);
        let h = r.rescore_hypothesis("plain english text", 0.8);
        assert_eq!(h.lm_score, 0.0);
        assert_eq!(h.asr_score, 0.8);
    }

    #[test]
    fn corpus_sentence_outscores_junk_at_equal_asr() {
        let (r, _dir) = loaded_rescorer(0.3);
        let good = r.rescore_hypothesis("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", 0.8);
        let junk = r.rescore_hypothesis("ਜੰਗਲ ਮੋਰ ਪਹਾੜ ਦਰਿਆ ਬੱਦਲ ਬਾਰਸ਼", 0.8);
        assert!(
            good.combined_score > junk.combined_score,
            "good {} <= junk {}",
            good.combined_score,
            junk.combined_score
        );
        assert!(good.perplexity < junk.perplexity);
    }

    // --- rescore (list) ---

    #[test]
    fn rescore_sorts_descending_by_combined_score() {
        let (r, _dir) = loaded_rescorer(0.3);
        let hypotheses = vec![
            "ਜੰਗਲ ਮੋਰ ਪਹਾੜ ਦਰਿਆ".to_string(),
            "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ".to_string(),
        ];
        let ranked = r.rescore(&hypotheses, Some(&[0.7, 0.7]));

        for pair in ranked.windows(2) {
            assert!(pair[0].combined_score >= pair[1].combined_score);
        }
        assert_eq!(ranked[0].text, "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ");
    }

    #[test]
    fn ties_preserve_original_order() {
        let (r, _dir) = unloaded_rescorer();
        // Unloaded model: every hypothesis keeps sigmoid(0) for the LM term,
        // so equal confidences tie exactly.
        let hypotheses = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        let ranked = r.rescore(&hypotheses, Some(&[0.5, 0.5, 0.5]));

        let texts: Vec<&str> = ranked.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn missing_confidences_default_to_half() {
        let (r, _dir) = loaded_rescorer(0.3);
        let ranked = r.rescore(&["ਹਰਿ ਨਾਮੁ ਧਿਆਇ".to_string()], None);
        assert_eq!(ranked[0].asr_score, 0.5);
    }

    #[test]
    fn empty_hypothesis_list_is_fine() {
        let (r, _dir) = loaded_rescorer(0.3);
        assert!(r.rescore(&[], None).is_empty());
    }

    // --- weight monotonicity ---

    #[test]
    fn raising_the_weight_shifts_ranking_toward_the_lm() {
        // Junk has the better acoustic score; the corpus line the better LM
        // score.  At low weight acoustics win; at high weight the LM does.
        let hypotheses = vec![
            "ਜੰਗਲ ਮੋਰ ਪਹਾੜ ਦਰਿਆ ਬੱਦਲ ਬਾਰਸ਼".to_string(),
            "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ".to_string(),
        ];
        let confidences = [0.9, 0.8];

        let (acoustic, _d1) = loaded_rescorer(0.0);
        let ranked = acoustic.rescore(&hypotheses, Some(&confidences));
        assert_eq!(ranked[0].text, hypotheses[0]);

        let (lm_heavy, _d2) = loaded_rescorer(0.9);
        let ranked = lm_heavy.rescore(&hypotheses, Some(&confidences));
        assert_eq!(ranked[0].text, hypotheses[1]);
    }

    // --- boost_if_canonical_fit ---

    #[test]
    fn corpus_like_text_gets_the_full_boost() {
        let (r, _dir) = loaded_rescorer(0.3);
        // In-corpus line → very low perplexity → full boost.
        let boosted = r.boost_if_canonical_fit("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", 0.6, 0.2);
        assert!((boosted - 0.8).abs() < 1e-6, "boosted = {boosted}");
    }

    #[test]
    fn boost_is_clamped_to_one() {
        let (r, _dir) = loaded_rescorer(0.3);
        let boosted = r.boost_if_canonical_fit("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ", 0.95, 0.2);
        assert_eq!(boosted, 1.0);
    }

    #[test]
    fn non_gurmukhi_text_is_never_boosted() {
        let (r, _dir) = loaded_rescorer(0.3);
        assert_eq!(r.boost_if_canonical_fit("plain english", 0.6, 0.2), 0.6);
    }

    #[test]
    fn unloaded_model_never_boosts() {
        let (r, _dir) = unloaded_rescorer();
        assert_eq!(r.boost_if_canonical_fit("ਹਰਿ ਨਾਮੁ", 0.6, 0.2), 0.6);
    }

    // --- band arithmetic ---

    #[test]
    fn perplexity_bands_quarter_the_boost() {
        assert_eq!(perplexity_boost(30.0, 0.2), 0.2);
        assert_eq!(perplexity_boost(75.0, 0.2), 0.1);
        assert_eq!(perplexity_boost(150.0, 0.2), 0.05);
        assert_eq!(perplexity_boost(250.0, 0.2), 0.0);
    }

    #[test]
    fn band_edges_fall_into_the_next_band() {
        assert_eq!(perplexity_boost(50.0, 0.2), 0.1);
        assert_eq!(perplexity_boost(100.0, 0.2), 0.05);
        assert_eq!(perplexity_boost(200.0, 0.2), 0.0);
    }

    // --- sigmoid ---

    #[test]
    fn sigmoid_is_centered_and_bounded() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-10.0) > 0.0 && sigmoid(-10.0) < 0.5);
        assert!(sigmoid(10.0) > 0.5 && sigmoid(10.0) < 1.0);
    }
}
