//! Configuration module for the quotation-matching core.
//!
//! Provides `CoreConfig` (top-level settings), sub-configs for each
//! subsystem, `AppPaths` for cross-platform data directories, and TOML
//! persistence via `CoreConfig::load` / `CoreConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    CoreConfig, DetectorConfig, LmConfig, MatcherConfig, ReplaceConfig, RescoreConfig,
};
