//! Core settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! Two policy constants are deliberately *not* configurable and live next to
//! the code they govern: the matcher's minimum-return score
//! (`matching::matcher::MIN_RETURN_SCORE`) and the replacer's auto-accept
//! bound (`pipeline::replace::AUTO_ACCEPT_THRESHOLD`).

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// MatcherConfig
// ---------------------------------------------------------------------------

/// Settings for candidate lookup and alignment acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Combined alignment score at or above which a match is considered
    /// confident (0.0 – 1.0).
    pub alignment_threshold: f32,
    /// How many candidate lines to request from the index per query.
    pub top_k: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            alignment_threshold: 0.85,
            top_k: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// DetectorConfig
// ---------------------------------------------------------------------------

/// Settings for the high-recall candidate detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum word count for the fallback word-window signal.
    pub min_words: usize,
    /// Maximum word count for the fallback word-window signal.
    pub max_words: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_words: 4,
            max_words: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// LmConfig
// ---------------------------------------------------------------------------

/// Settings for the corpus language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LmConfig {
    /// N-gram order for the word-level model.
    pub word_order: usize,
    /// N-gram order for the character-level model.
    pub char_order: usize,
    /// Additive (Laplace) smoothing constant; must stay > 0 so no n-gram
    /// ever scores a zero probability.
    pub smoothing_alpha: f64,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            word_order: 3,
            char_order: 4,
            smoothing_alpha: 0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// RescoreConfig
// ---------------------------------------------------------------------------

/// Settings for LM-based hypothesis reranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescoreConfig {
    /// Interpolation weight given to the normalized LM score
    /// (`combined = (1-w)·asr + w·lm`).
    pub weight: f32,
    /// Minimum Gurmukhi character ratio (ignoring whitespace) below which a
    /// hypothesis is not rescored at all.
    pub min_script_ratio: f32,
}

impl Default for RescoreConfig {
    fn default() -> Self {
        Self {
            weight: 0.3,
            min_script_ratio: 0.3,
        }
    }
}

// ---------------------------------------------------------------------------
// ReplaceConfig
// ---------------------------------------------------------------------------

/// Settings for the replacement decision policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceConfig {
    /// Match confidence at or above which the displayed text is replaced by
    /// the canonical text (0.0 – 1.0).
    pub replace_threshold: f32,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            replace_threshold: 0.90,
        }
    }
}

// ---------------------------------------------------------------------------
// CoreConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use gurbani_quote::config::CoreConfig;
///
/// // Load (returns Default when file is missing)
/// let config = CoreConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Candidate lookup and alignment acceptance settings.
    pub matcher: MatcherConfig,
    /// Candidate detection settings.
    pub detector: DetectorConfig,
    /// Language-model settings.
    pub lm: LmConfig,
    /// Hypothesis-rescoring settings.
    pub rescore: RescoreConfig,
    /// Replacement policy settings.
    pub replace: ReplaceConfig,
}

impl CoreConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(CoreConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify default values match the published policy constants.
    #[test]
    fn default_values_match_published_policy() {
        let cfg = CoreConfig::default();

        assert_eq!(cfg.matcher.alignment_threshold, 0.85);
        assert_eq!(cfg.matcher.top_k, 5);
        assert_eq!(cfg.detector.min_words, 4);
        assert_eq!(cfg.detector.max_words, 30);
        assert_eq!(cfg.lm.word_order, 3);
        assert_eq!(cfg.lm.char_order, 4);
        assert_eq!(cfg.lm.smoothing_alpha, 0.01);
        assert_eq!(cfg.rescore.weight, 0.3);
        assert_eq!(cfg.rescore.min_script_ratio, 0.3);
        assert_eq!(cfg.replace.replace_threshold, 0.90);
    }

    /// Verify that a default `CoreConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = CoreConfig::default();
        original.save_to(&path).expect("save");

        let loaded = CoreConfig::load_from(&path).expect("load");
        assert_eq!(original, loaded);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = CoreConfig::load_from(&path).expect("should not error");
        assert_eq!(config, CoreConfig::default());
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = CoreConfig::default();
        cfg.matcher.alignment_threshold = 0.80;
        cfg.matcher.top_k = 10;
        cfg.detector.min_words = 2;
        cfg.lm.word_order = 4;
        cfg.rescore.weight = 0.5;
        cfg.replace.replace_threshold = 0.95;

        cfg.save_to(&path).expect("save");
        let loaded = CoreConfig::load_from(&path).expect("load");

        assert_eq!(loaded.matcher.alignment_threshold, 0.80);
        assert_eq!(loaded.matcher.top_k, 10);
        assert_eq!(loaded.detector.min_words, 2);
        assert_eq!(loaded.lm.word_order, 4);
        assert_eq!(loaded.rescore.weight, 0.5);
        assert_eq!(loaded.replace.replace_threshold, 0.95);
    }
}
