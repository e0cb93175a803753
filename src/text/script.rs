//! Gurmukhi script utilities.
//!
//! Everything downstream (detection, alignment, language modelling) needs the
//! same three primitives:
//!
//! 1. A predicate for "is this character Gurmukhi?" (U+0A01 – U+0A75).
//! 2. Script-density ratios over a text span.
//! 3. Tokenizers that split a span into Gurmukhi word tokens or char tokens.

use once_cell::sync::Lazy;
use regex::Regex;

// ---------------------------------------------------------------------------
// Unicode ranges
// ---------------------------------------------------------------------------

/// First codepoint of the Gurmukhi Unicode block we consider.
///
/// U+0A00 is unassigned; the first assigned mark (ਁ — adak bindi) is U+0A01.
const GURMUKHI_START: char = '\u{0A01}';

/// Last codepoint covered by our range.
///
/// U+0A75 (਼ੵ — sign yakash) is the last assigned codepoint in the core block
/// we care about; the Ek Onkar ligature ੴ (U+0A74) sits just below it.
const GURMUKHI_END: char = '\u{0A75}';

/// Matches one run of Gurmukhi codepoints — a word token for alignment and
/// language-model purposes.
static GURMUKHI_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{0A01}-\u{0A75}]+").expect("static word pattern"));

// ---------------------------------------------------------------------------
// Predicates and ratios
// ---------------------------------------------------------------------------

/// Returns `true` if `c` falls within the Gurmukhi Unicode block (U+0A01–U+0A75).
#[inline]
pub fn is_gurmukhi(c: char) -> bool {
    (GURMUKHI_START..=GURMUKHI_END).contains(&c)
}

/// Fraction of non-whitespace characters that are Gurmukhi, in `[0.0, 1.0]`.
///
/// Returns `0.0` for empty or whitespace-only input.
pub fn gurmukhi_ratio(text: &str) -> f32 {
    let mut total = 0usize;
    let mut gurmukhi = 0usize;
    for c in text.chars() {
        if c.is_whitespace() {
            continue;
        }
        total += 1;
        if is_gurmukhi(c) {
            gurmukhi += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        gurmukhi as f32 / total as f32
    }
}

/// Fraction of *alphanumeric* characters that are Gurmukhi, in `[0.0, 1.0]`.
///
/// Punctuation and whitespace are ignored entirely, so a span like
/// `"ਸਤਿਗੁਰ, ok!"` is judged only on its letters and digits.
pub fn gurmukhi_alnum_ratio(text: &str) -> f32 {
    let mut total = 0usize;
    let mut gurmukhi = 0usize;
    for c in text.chars() {
        if !c.is_alphanumeric() {
            continue;
        }
        total += 1;
        if is_gurmukhi(c) {
            gurmukhi += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        gurmukhi as f32 / total as f32
    }
}

// ---------------------------------------------------------------------------
// Tokenizers
// ---------------------------------------------------------------------------

/// Split `text` into Gurmukhi word tokens (maximal runs of Gurmukhi
/// codepoints).  Non-Gurmukhi material acts as a separator and is dropped.
pub fn word_tokens(text: &str) -> Vec<String> {
    GURMUKHI_WORD
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Split `text` into single-character tokens, skipping whitespace.
///
/// Used by the character-level language model; every non-whitespace
/// codepoint becomes its own token.
pub fn char_tokens(text: &str) -> Vec<String> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
