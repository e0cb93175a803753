//! Reference-corpus data model and index boundary.
//!
//! This module provides:
//! * [`CanonicalLine`] — one immutable line of scripture with its metadata.
//! * [`ScriptureSource`] — closed enum of the collections we serve.
//! * [`ScriptureIndex`] — the external search capability consumed by the
//!   matcher, one implementation per collection.
//! * [`InMemoryIndex`] — token-overlap reference implementation.
//! * [`IndexError`] — error variants for index operations.

pub mod index;
pub mod line;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use index::{InMemoryIndex, IndexError, ScriptureIndex};
pub use line::{CanonicalLine, ScriptureSource};
