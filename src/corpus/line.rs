//! Canonical reference records.
//!
//! A [`CanonicalLine`] is one line of scripture as stored in the reference
//! corpus.  Records are loaded once and never mutated; everything that holds
//! one after that point may share it freely across threads.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ScriptureSource
// ---------------------------------------------------------------------------

/// The collection a canonical line belongs to.
///
/// Modelled as a closed enum so the matcher stays source-agnostic: adding a
/// collection means adding a variant and an index for it, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptureSource {
    /// Sri Guru Granth Sahib.
    Sggs,
    /// Dasam Granth.
    DasamGranth,
    /// Vaaran and kabits of Bhai Gurdas.
    BhaiGurdas,
    /// Writings of Bhai Nand Lal.
    BhaiNandLal,
    /// Any other devotional collection served by an index.
    Other,
}

impl ScriptureSource {
    /// A short human-readable label for logs and audit records.
    pub fn label(&self) -> &'static str {
        match self {
            ScriptureSource::Sggs => "Sri Guru Granth Sahib",
            ScriptureSource::DasamGranth => "Dasam Granth",
            ScriptureSource::BhaiGurdas => "Bhai Gurdas",
            ScriptureSource::BhaiNandLal => "Bhai Nand Lal",
            ScriptureSource::Other => "Other",
        }
    }
}

// ---------------------------------------------------------------------------
// CanonicalLine
// ---------------------------------------------------------------------------

/// One immutable line of the reference corpus.
///
/// `locator` is an opaque page/folio identifier (the *ang* for SGGS) used
/// only as a ranking hint; `musical_mode` (raag) and `author` are metadata
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLine {
    /// Stable identifier of the line within the reference store.
    pub id: u64,
    /// The authoritative Gurmukhi text.
    pub text: String,
    /// Roman transliteration, when the store provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
    /// Which collection the line belongs to.
    pub source: ScriptureSource,
    /// Opaque page / folio identifier (ang), never interpreted semantically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    /// Raag the line is set in, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub musical_mode: Option<String>,
    /// Attributed author, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Identifier of the shabad / stanza group the line belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,
}

impl CanonicalLine {
    /// Construct a bare line with only the required fields set.
    ///
    /// Optional metadata defaults to `None`; useful for tests and for stores
    /// that carry text-only collections.
    pub fn new(id: u64, text: impl Into<String>, source: ScriptureSource) -> Self {
        Self {
            id,
            text: text.into(),
            transliteration: None,
            source,
            locator: None,
            musical_mode: None,
            author: None,
            group_id: None,
        }
    }

    /// Returns `true` when the record carries no usable canonical text.
    ///
    /// Such records are skipped by the matcher rather than failing the whole
    /// candidate list.
    pub fn is_malformed(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_required_fields_only() {
        let line = CanonicalLine::new(7, "ਸਤਿਗੁਰ ਪ੍ਰਸਾਦਿ", ScriptureSource::Sggs);
        assert_eq!(line.id, 7);
        assert_eq!(line.source, ScriptureSource::Sggs);
        assert!(line.locator.is_none());
        assert!(line.transliteration.is_none());
    }

    #[test]
    fn empty_text_is_malformed() {
        assert!(CanonicalLine::new(1, "", ScriptureSource::Sggs).is_malformed());
        assert!(CanonicalLine::new(2, "   ", ScriptureSource::Sggs).is_malformed());
        assert!(!CanonicalLine::new(3, "ਹਰਿ", ScriptureSource::Sggs).is_malformed());
    }

    #[test]
    fn source_labels_are_distinct() {
        let labels = [
            ScriptureSource::Sggs.label(),
            ScriptureSource::DasamGranth.label(),
            ScriptureSource::BhaiGurdas.label(),
            ScriptureSource::BhaiNandLal.label(),
            ScriptureSource::Other.label(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in labels.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn serializes_without_absent_optionals() {
        let line = CanonicalLine::new(1, "ਹਰਿ", ScriptureSource::Sggs);
        let json = serde_json::to_string(&line).unwrap();
        assert!(!json.contains("locator"));
        assert!(!json.contains("transliteration"));
    }

    #[test]
    fn round_trips_through_json() {
        let mut line = CanonicalLine::new(42, "ਸਤਿ ਨਾਮੁ", ScriptureSource::DasamGranth);
        line.locator = Some("1".into());
        line.author = Some("Guru Nanak Dev Ji".into());

        let json = serde_json::to_string(&line).unwrap();
        let back: CanonicalLine = serde_json::from_str(&json).unwrap();
        assert_eq!(line, back);
    }
}
