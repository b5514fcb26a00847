//! Cross-platform configuration path using the `dirs` crate.
//!
//! Layout:
//!
//!   Windows: %APPDATA%\campsite-classifier\settings.toml
//!   macOS:   ~/Library/Application Support/campsite-classifier/settings.toml
//!   Linux:   ~/.config/campsite-classifier/settings.toml

use std::path::PathBuf;

/// Resolved application paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "campsite-classifier";

    /// Falls back to the current directory if the platform has no config dir.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);
        let settings_file = config_dir.join("settings.toml");

        Self {
            config_dir,
            settings_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
