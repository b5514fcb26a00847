//! Classifier settings, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every table is `#[serde(default)]`, so a partial `settings.toml` only
//! overrides the keys it names.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable consulted for the AI provider key by default.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

// ---------------------------------------------------------------------------
// AiProvider
// ---------------------------------------------------------------------------

/// Wire format used for the AI disambiguation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AiProvider {
    /// Google Gemini `generateContent`.
    Gemini,
    /// Any OpenAI-compatible `/v1/chat/completions` API (OpenAI, Groq,
    /// Ollama in OpenAI mode …).
    OpenAiCompatible,
}

impl Default for AiProvider {
    fn default() -> Self {
        Self::Gemini
    }
}

// ---------------------------------------------------------------------------
// AiConfig
// ---------------------------------------------------------------------------

/// Settings for the AI disambiguation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Whether the AI stage may run at all.
    pub enabled: bool,
    /// Which wire format to speak.
    pub provider: AiProvider,
    /// Base URL of the API endpoint.
    ///
    /// - Gemini: `https://generativelanguage.googleapis.com`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key stored in the file.  The environment variable named by
    /// `api_key_env` takes precedence.
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Model identifier (e.g. `"gemini-1.5-flash"`, `"gpt-4o-mini"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for the provider before falling back.
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: AiProvider::default(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            model: "gemini-1.5-flash".into(),
            temperature: 0.1,
            timeout_secs: 8,
        }
    }
}

impl AiConfig {
    /// Resolve the API key: environment variable first, then the file.
    ///
    /// Returns `None` when the stage is disabled or no non-empty key is
    /// found; the classifier then runs heuristic-only.
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let from_env = std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        from_env.or_else(|| {
            self.api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
        })
    }
}

// ---------------------------------------------------------------------------
// ClassifierConfig
// ---------------------------------------------------------------------------

/// Settings for the two-stage orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Heuristic results with confidence strictly below this value are sent
    /// to the AI stage.
    pub confidence_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use campsite_classifier::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert!(config.classifier.confidence_threshold > 0.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub classifier: ClassifierConfig,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(
            original.classifier.confidence_threshold,
            loaded.classifier.confidence_threshold
        );
        assert_eq!(original.ai.enabled, loaded.ai.enabled);
        assert_eq!(original.ai.provider, loaded.ai.provider);
        assert_eq!(original.ai.base_url, loaded.ai.base_url);
        assert_eq!(original.ai.api_key, loaded.ai.api_key);
        assert_eq!(original.ai.api_key_env, loaded.ai.api_key_env);
        assert_eq!(original.ai.model, loaded.ai.model);
        assert_eq!(original.ai.temperature, loaded.ai.temperature);
        assert_eq!(original.ai.timeout_secs, loaded.ai.timeout_secs);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.classifier.confidence_threshold, 0.7);
        assert_eq!(config.ai.model, AiConfig::default().model);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.classifier.confidence_threshold, 0.7);
        assert!(cfg.ai.enabled);
        assert_eq!(cfg.ai.provider, AiProvider::Gemini);
        assert_eq!(cfg.ai.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(cfg.ai.api_key_env, "GEMINI_API_KEY");
        assert!(cfg.ai.api_key.is_none());
        assert_eq!(cfg.ai.timeout_secs, 8);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.classifier.confidence_threshold = 0.6;
        cfg.ai.provider = AiProvider::OpenAiCompatible;
        cfg.ai.base_url = "https://api.openai.com".into();
        cfg.ai.api_key = Some("sk-test".into());
        cfg.ai.model = "gpt-4o-mini".into();
        cfg.ai.timeout_secs = 5;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.classifier.confidence_threshold, 0.6);
        assert_eq!(loaded.ai.provider, AiProvider::OpenAiCompatible);
        assert_eq!(loaded.ai.base_url, "https://api.openai.com");
        assert_eq!(loaded.ai.api_key, Some("sk-test".into()));
        assert_eq!(loaded.ai.model, "gpt-4o-mini");
        assert_eq!(loaded.ai.timeout_secs, 5);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[classifier]\nconfidence_threshold = 0.65\n").unwrap();

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.classifier.confidence_threshold, 0.65);
        assert_eq!(cfg.ai.model, "gemini-1.5-flash");
    }

    #[test]
    fn api_key_resolution() {
        let mut ai = AiConfig {
            api_key_env: "CAMPSITE_CLASSIFIER_TEST_KEY_RESOLUTION".into(),
            ..AiConfig::default()
        };
        assert_eq!(ai.resolve_api_key(), None);

        ai.api_key = Some("   ".into());
        assert_eq!(ai.resolve_api_key(), None, "blank key counts as missing");

        ai.api_key = Some("from-file".into());
        assert_eq!(ai.resolve_api_key().as_deref(), Some("from-file"));

        std::env::set_var("CAMPSITE_CLASSIFIER_TEST_KEY_RESOLUTION", "from-env");
        assert_eq!(ai.resolve_api_key().as_deref(), Some("from-env"));

        ai.enabled = false;
        assert_eq!(ai.resolve_api_key(), None);
        std::env::remove_var("CAMPSITE_CLASSIFIER_TEST_KEY_RESOLUTION");
    }
}
