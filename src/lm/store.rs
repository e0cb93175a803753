//! Versioned persistence and build-once serving of the language model.
//!
//! # Overview
//!
//! [`ModelStore`] owns the single artifact file: a JSON blob holding the
//! complete built model (counts, vocabulary, metadata, build version).
//! A missing, unreadable or version-mismatched artifact triggers a
//! synchronous rebuild from the corpus, which is persisted before the model
//! is served.
//!
//! [`ModelHandle`] wraps a store in a build-once cell.  It is an explicitly
//! constructed, injected dependency — not a process-wide global — so tests
//! can build isolated models.  Concurrent callers during the build window
//! block only on the build; all subsequent reads are lock-free.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use thiserror::Error;

use crate::lm::model::{LanguageModel, MODEL_BUILD_VERSION};

// ---------------------------------------------------------------------------
// ModelStoreError
// ---------------------------------------------------------------------------

/// All errors that can surface while loading or saving the model artifact.
#[derive(Debug, Error)]
pub enum ModelStoreError {
    /// The artifact file could not be read or written.
    #[error("model artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact file exists but is not a valid model blob.
    #[error("model artifact is corrupt: {0}")]
    Parse(#[from] serde_json::Error),

    /// The artifact was produced by an incompatible build procedure.
    #[error("model artifact version {found:?} does not match {MODEL_BUILD_VERSION:?}")]
    Version { found: String },
}

// ---------------------------------------------------------------------------
// ModelStore
// ---------------------------------------------------------------------------

/// Loads and saves the single versioned model artifact.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    /// Create a store over the given artifact path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the artifact file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the artifact.
    ///
    /// # Errors
    ///
    /// - [`ModelStoreError::Io`] — file missing or unreadable.
    /// - [`ModelStoreError::Parse`] — file is not a valid model blob.
    /// - [`ModelStoreError::Version`] — blob built by an incompatible version.
    pub fn load(&self) -> Result<LanguageModel, ModelStoreError> {
        let data = std::fs::read_to_string(&self.path)?;
        let model: LanguageModel = serde_json::from_str(&data)?;

        if model.build_version() != MODEL_BUILD_VERSION {
            return Err(ModelStoreError::Version {
                found: model.build_version().to_string(),
            });
        }

        Ok(model)
    }

    /// Persist `model` to the artifact path, creating parent directories as
    /// needed.
    pub fn save(&self, model: &LanguageModel) -> Result<(), ModelStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string(model)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    /// Load the artifact, or rebuild synchronously from the corpus and
    /// persist before returning.
    ///
    /// The corpus is fetched through a closure so the (possibly expensive)
    /// line load only happens when a rebuild is actually needed.  Persisting
    /// the rebuilt model is best-effort: a write failure is logged and the
    /// freshly built model is served anyway.
    pub fn load_or_build<F>(&self, order: usize, alpha: f64, corpus: F) -> LanguageModel
    where
        F: FnOnce() -> Vec<String>,
    {
        match self.load() {
            Ok(model) => {
                log::debug!(
                    "lm: loaded artifact from {} ({} lines)",
                    self.path.display(),
                    model.line_count()
                );
                return model;
            }
            Err(ModelStoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("lm: no artifact at {}, building", self.path.display());
            }
            Err(e) => {
                log::warn!("lm: artifact unusable ({e}), rebuilding");
            }
        }

        let lines = corpus();
        let model = LanguageModel::build(lines.iter().map(String::as_str), order, alpha);

        if let Err(e) = self.save(&model) {
            log::warn!("lm: could not persist rebuilt artifact: {e}");
        }

        model
    }
}

// ---------------------------------------------------------------------------
// ModelHandle
// ---------------------------------------------------------------------------

/// Build-once, read-many handle to the language model.
///
/// ```rust
/// use gurbani_quote::lm::{ModelHandle, ModelStore};
///
/// let dir = tempfile::tempdir().unwrap();
/// let handle = ModelHandle::new(ModelStore::new(dir.path().join("lm-word.json")));
///
/// assert!(!handle.is_loaded());
/// let model = handle.get_or_build(3, 0.01, || vec!["ਹਰਿ ਹਰਿ ਨਾਮੁ ਜਪਹੁ".to_string()]);
/// assert!(handle.is_loaded());
/// assert_eq!(model.order(), 3);
/// ```
pub struct ModelHandle {
    store: ModelStore,
    cell: OnceLock<Arc<LanguageModel>>,
}

impl ModelHandle {
    /// Create an unloaded handle over `store`.
    pub fn new(store: ModelStore) -> Self {
        Self {
            store,
            cell: OnceLock::new(),
        }
    }

    /// Returns `true` once the model has been loaded or built.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// The model, if already loaded or built; never triggers a build.
    pub fn get(&self) -> Option<Arc<LanguageModel>> {
        self.cell.get().cloned()
    }

    /// The model, loading or building it on first call.
    ///
    /// At most one build ever runs; concurrent callers arriving during the
    /// build window block until it finishes, then share the same instance.
    pub fn get_or_build<F>(&self, order: usize, alpha: f64, corpus: F) -> Arc<LanguageModel>
    where
        F: FnOnce() -> Vec<String>,
    {
        self.cell
            .get_or_init(|| Arc::new(self.store.load_or_build(order, alpha, corpus)))
            .clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
