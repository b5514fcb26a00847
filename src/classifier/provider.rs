//! `AiClassifier` trait and the `ApiClassifier` HTTP implementation.
//!
//! `ApiClassifier` speaks either the Gemini `generateContent` wire format or
//! any OpenAI-compatible `/v1/chat/completions` endpoint, selected by
//! [`AiProvider`].  All connection details come from [`AiConfig`]; the only
//! built-in URL is the config default.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::classifier::prompt::PromptBuilder;
use crate::classifier::reply::parse_reply;
use crate::config::{AiConfig, AiProvider};
use crate::place::PlaceCandidate;
use crate::taxonomy::ClassificationResult;

// ---------------------------------------------------------------------------
// AiError
// ---------------------------------------------------------------------------

/// Errors from the AI disambiguation stage.  None of them reach callers of
/// [`TypeClassifier`](crate::classifier::TypeClassifier); they select the
/// heuristic fallback.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("AI request timed out")]
    Timeout,

    /// The provider rejected the API key.
    #[error("AI provider rejected credentials (HTTP {0})")]
    Auth(u16),

    /// The provider is throttling us.
    #[error("AI provider rate limit exceeded")]
    RateLimited,

    /// Any other non-2xx status.
    #[error("AI provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response (envelope or reply text) is not valid JSON.
    #[error("failed to parse AI response: {0}")]
    Parse(String),

    /// The response carried no usable text.
    #[error("AI returned an empty response")]
    EmptyResponse,

    /// The reply parsed but failed shape/range validation.
    #[error("AI reply rejected: {0}")]
    InvalidReply(String),
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else {
            AiError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// AiClassifier trait
// ---------------------------------------------------------------------------

/// Async second-opinion classifier.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn AiClassifier>`.
///
/// # Arguments
/// * `place` – Candidate to classify.
/// * `hint`  – Low-confidence heuristic result, used to bias the prompt.
#[async_trait]
pub trait AiClassifier: Send + Sync {
    async fn classify(
        &self,
        place: &PlaceCandidate,
        hint: Option<&ClassificationResult>,
    ) -> Result<ClassificationResult, AiError>;
}

// ---------------------------------------------------------------------------
// ApiClassifier
// ---------------------------------------------------------------------------

/// Calls a hosted generative model over HTTP.
pub struct ApiClassifier {
    client: reqwest::Client,
    config: AiConfig,
    api_key: String,
    prompt_builder: PromptBuilder,
}

impl ApiClassifier {
    /// Build a classifier from config and a resolved API key.
    ///
    /// `config.timeout_secs` bounds every request; it is applied per request
    /// so it holds even when the client builder falls back to defaults.
    pub fn new(config: &AiConfig, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("campsite-classifier/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build HTTP client ({e}); using defaults");
                reqwest::Client::new()
            });

        Self {
            client,
            config: config.clone(),
            api_key: api_key.into(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    /// Build from config, resolving the API key from the environment or the
    /// config file.  `None` when no key is available (AI stage skipped).
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        config.resolve_api_key().map(|key| Self::new(config, key))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Endpoint URL for the configured provider.
    pub fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match self.config.provider {
            AiProvider::Gemini => {
                format!("{}/v1beta/models/{}:generateContent", base, self.config.model)
            }
            AiProvider::OpenAiCompatible => format!("{}/v1/chat/completions", base),
        }
    }

    /// JSON request body for the configured provider.
    pub fn request_body(
        &self,
        place: &PlaceCandidate,
        hint: Option<&ClassificationResult>,
    ) -> Value {
        match self.config.provider {
            AiProvider::Gemini => {
                let prompt = self.prompt_builder.build(place, hint);
                serde_json::json!({
                    "contents": [
                        { "parts": [ { "text": prompt } ] }
                    ],
                    "generationConfig": {
                        "temperature":      self.config.temperature,
                        "responseMimeType": "application/json"
                    }
                })
            }
            AiProvider::OpenAiCompatible => {
                let (system_msg, user_msg) = self.prompt_builder.build_chat(place, hint);
                serde_json::json!({
                    "model":       self.config.model,
                    "messages": [
                        { "role": "system", "content": system_msg },
                        { "role": "user",   "content": user_msg   }
                    ],
                    "stream":      false,
                    "temperature": self.config.temperature,
                    "max_tokens":  128
                })
            }
        }
    }

    async fn send(&self, body: &Value) -> Result<Value, AiError> {
        let mut req = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout())
            .json(body);
        req = match self.config.provider {
            AiProvider::Gemini => req.header("x-goog-api-key", &self.api_key),
            AiProvider::OpenAiCompatible => req.bearer_auth(&self.api_key),
        };

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiError::Auth(status.as_u16()),
                StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited,
                s => AiError::Status {
                    status: s.as_u16(),
                    body: response.text().await.unwrap_or_default(),
                },
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))
    }
}

/// Pull the model's reply text out of a provider response envelope.
pub fn reply_text(provider: &AiProvider, envelope: &Value) -> Result<String, AiError> {
    let text = match provider {
        AiProvider::Gemini => envelope["candidates"][0]["content"]["parts"][0]["text"].as_str(),
        AiProvider::OpenAiCompatible => envelope["choices"][0]["message"]["content"].as_str(),
    };
    let text = text.ok_or(AiError::EmptyResponse)?.trim();
    if text.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(text.to_string())
}

#[async_trait]
impl AiClassifier for ApiClassifier {
    async fn classify(
        &self,
        place: &PlaceCandidate,
        hint: Option<&ClassificationResult>,
    ) -> Result<ClassificationResult, AiError> {
        let body = self.request_body(place, hint);
        let envelope = self.send(&body).await?;
        let text = reply_text(&self.config.provider, &envelope)?;
        parse_reply(&text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
