//! Deterministic pre-match normalization of recognized Gurmukhi text.
//!
//! Speech recognition output for Gurmukhi shows a small set of systematic
//! confusions, corrected here by a fixed, ordered substitution table:
//!
//! 1. Duplicated vowel signs (matras) collapse to a single sign.
//! 2. Duplicated nasalization marks (bindi / tippi / addak) collapse.
//! 3. Vowel-bearer sequences compose into the independent vowel
//!    (ਅ+ਾ → ਆ, ੲ+ਿ → ਇ, ੳ+ੁ → ਉ, and their families).
//! 4. Decomposed nukta consonants compose into their precomposed form
//!    (ਖ+਼ → ਖ਼, …).
//!
//! A final whitespace collapse turns any run of whitespace into one space and
//! trims the ends.  The whole transform is pure, deterministic, and
//! idempotent: `normalize(normalize(s)) == normalize(s)`.

use once_cell::sync::Lazy;
use regex::Regex;

// ---------------------------------------------------------------------------
// Substitution table
// ---------------------------------------------------------------------------

/// Vowel signs that recognition output sometimes doubles.
const MATRAS: [char; 9] = ['ਾ', 'ਿ', 'ੀ', 'ੁ', 'ੂ', 'ੇ', 'ੈ', 'ੋ', 'ੌ'];

/// Nasalization / gemination marks that recognition output sometimes doubles.
const NASAL_MARKS: [char; 3] = ['ਂ', 'ੰ', 'ੱ'];

/// Vowel-bearer + matra sequences and the independent vowel they denote.
const VOWEL_COMPOSITIONS: [(&str, &str); 9] = [
    ("ਅਾ", "ਆ"),
    ("ਅੈ", "ਐ"),
    ("ਅੌ", "ਔ"),
    ("ੲਿ", "ਇ"),
    ("ੲੀ", "ਈ"),
    ("ੲੇ", "ਏ"),
    ("ੳੁ", "ਉ"),
    ("ੳੂ", "ਊ"),
    ("ੳੋ", "ਓ"),
];

/// Decomposed consonant + nukta sequences and their precomposed codepoint.
const NUKTA_COMPOSITIONS: [(&str, &str); 6] = [
    ("ਖ\u{0A3C}", "\u{0A59}"),
    ("ਗ\u{0A3C}", "\u{0A5A}"),
    ("ਜ\u{0A3C}", "\u{0A5B}"),
    ("ਫ\u{0A3C}", "\u{0A5E}"),
    ("ਲ\u{0A3C}", "\u{0A33}"),
    ("ਸ\u{0A3C}", "\u{0A36}"),
];

/// The full ordered substitution table.
///
/// Mark de-duplication must run before vowel composition: `ਅਾਾ` first
/// collapses to `ਅਾ`, which then composes to `ਆ`.
static RULES: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    let mut rules = Vec::new();

    // 1–2. Collapse doubled marks.  The `regex` crate has no backreferences,
    // so each mark gets its own rule.
    for m in MATRAS.into_iter().chain(NASAL_MARKS) {
        let pattern = format!("{m}{{2,}}");
        rules.push((Regex::new(&pattern).expect("mark rule"), m.to_string()));
    }

    // 3. Vowel-bearer composition.
    for (from, to) in VOWEL_COMPOSITIONS {
        rules.push((Regex::new(&regex::escape(from)).expect("vowel rule"), to.to_string()));
    }

    // 4. Nukta composition.
    for (from, to) in NUKTA_COMPOSITIONS {
        rules.push((Regex::new(&regex::escape(from)).expect("nukta rule"), to.to_string()));
    }

    rules
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Apply the full normalization table to `text`.
///
/// Substitutions run in table order, then whitespace is collapsed to single
/// spaces and the result is trimmed.
///
/// # Examples
///
/// ```
/// use gurbani_quote::text::normalize;
///
/// assert_eq!(normalize("ਅਾਪੇ"), "ਆਪੇ");
/// assert_eq!(normalize("ਸਤਿਗੁਰ   ਪ੍ਰਸਾਦਿ "), "ਸਤਿਗੁਰ ਪ੍ਰਸਾਦਿ");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in RULES.iter() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, replacement.as_str()).into_owned();
        }
    }
    collapse_whitespace(&out)
}

/// Collapse every whitespace run in `text` to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- individual rules ---

    #[test]
    fn doubled_matra_collapses() {
        assert_eq!(normalize("ਗੁਰਾਾ"), "ਗੁਰਾ");
        assert_eq!(normalize("ਸਿਿਮਰ"), "ਸਿਮਰ");
    }

    #[test]
    fn doubled_bindi_and_tippi_collapse() {
        assert_eq!(normalize("ਮਾਂਂ"), "ਮਾਂ");
        assert_eq!(normalize("ਸੰੰਤ"), "ਸੰਤ");
    }

    #[test]
    fn vowel_bearer_composes() {
        assert_eq!(normalize("ਅਾਪ"), "ਆਪ");
        assert_eq!(normalize("ੲਿਕ"), "ਇਕ");
        assert_eq!(normalize("ੳੁਠ"), "ਉਠ");
    }

    #[test]
    fn doubled_matra_then_composition() {
        // Dedup must run first so the composition sees a single matra.
        assert_eq!(normalize("ਅਾਾਪ"), "ਆਪ");
    }

    #[test]
    fn decomposed_nukta_composes() {
        assert_eq!(normalize("ਖ\u{0A3C}ਾਲਸਾ"), "\u{0A59}ਾਲਸਾ");
        assert_eq!(normalize("ਜ\u{0A3C}ੋਰ"), "\u{0A5B}ੋਰ");
    }

    // --- whitespace ---

    #[test]
    fn whitespace_collapses_and_trims() {
        assert_eq!(normalize("  ਹਰਿ \t ਹਰਿ\nਹਰਿ  "), "ਹਰਿ ਹਰਿ ਹਰਿ");
    }

    #[test]
    fn empty_and_whitespace_only_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
    }

    // --- global properties ---

    #[test]
    fn clean_text_passes_through() {
        let clean = "ਸਤਿਗੁਰ ਪ੍ਰਸਾਦਿ";
        assert_eq!(normalize(clean), clean);
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "ਅਾਪੇ ਗੁਰਾਾ ਸੰੰਤ",
            "ੲਿਕ  ਓਅੰਕਾਰ",
            "ਖ\u{0A3C}ਾਲਸਾ ਮਾਂਂ",
            "plain ascii",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            let twice = normalize(&once);
            assert_eq!(once, twice, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn ascii_is_untouched_apart_from_whitespace() {
        assert_eq!(normalize("hello   world"), "hello world");
    }
}
