//! Configuration module for the campsite classifier.
//!
//! Provides `AppConfig` (top-level settings), `ClassifierConfig` and
//! `AiConfig`, `AppPaths` for the platform config directory, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AiConfig, AiProvider, AppConfig, ClassifierConfig, DEFAULT_API_KEY_ENV};
