//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\gurbani-quote\
//!   macOS:   ~/Library/Application Support/gurbani-quote/
//!   Linux:   ~/.config/gurbani-quote/
//!
//! Data dir (language-model artifacts):
//!   Windows: %LOCALAPPDATA%\gurbani-quote\
//!   macOS:   ~/Library/Application Support/gurbani-quote/
//!   Linux:   ~/.local/share/gurbani-quote/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for persisted language-model artifacts.
    pub models_dir: PathBuf,
    /// Full path to the word-level language-model artifact.
    pub word_model_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "gurbani-quote";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let models_dir = data_dir.join("models");
        let word_model_file = models_dir.join("lm-word.json");

        Self {
            config_dir,
            settings_file,
            models_dir,
            word_model_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
