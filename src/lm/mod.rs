//! Corpus language model: build, persist, serve.
//!
//! This module provides:
//! * [`LanguageModel`] — additively-smoothed n-gram model with
//!   `probability` / `score_sequence` / `perplexity`.
//! * [`ModelStore`] — versioned single-artifact JSON persistence with
//!   load-or-rebuild semantics.
//! * [`ModelHandle`] — injected build-once wrapper; at most one build ever
//!   runs, reads never block.
//! * [`ModelStoreError`] — error variants for artifact operations.
//!
//! # Quick start
//!
//! ```rust
//! use gurbani_quote::lm::{ModelHandle, ModelStore};
//! use gurbani_quote::text::word_tokens;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let handle = ModelHandle::new(ModelStore::new(dir.path().join("lm-word.json")));
//!
//! let model = handle.get_or_build(3, 0.01, || {
//!     vec![
//!         "ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ".to_string(),
//!         "ਨਾਨਕ ਨਾਮੁ ਚੜ੍ਹਦੀ ਕਲਾ".to_string(),
//!     ]
//! });
//!
//! let score = model.score_sequence(&word_tokens("ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ"));
//! assert!(score < 0.0);
//! ```

pub mod model;
pub mod store;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use model::{LanguageModel, END_TOKEN, MODEL_BUILD_VERSION, START_TOKEN};
pub use store::{ModelHandle, ModelStore, ModelStoreError};
