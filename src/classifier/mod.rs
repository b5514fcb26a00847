//! Campsite type classification.
//!
//! This module provides:
//! * [`TypeClassifier`]: two-stage orchestrator; the public entry point.
//! * [`HeuristicClassifier`]: bilingual keyword / tag / price scoring.
//! * [`AiClassifier`]: async trait for the second-opinion stage.
//! * [`ApiClassifier`]: Gemini / OpenAI-compatible HTTP implementation.
//! * [`PromptBuilder`]: builds the classification prompt.
//! * [`parse_reply`]: validates the model's JSON reply.
//! * [`AiError`]: error variants for the AI stage.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use campsite_classifier::classifier::TypeClassifier;
//! use campsite_classifier::config::AppConfig;
//! use campsite_classifier::place::PlaceCandidate;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load().unwrap_or_default();
//!
//!     // AI stage only when GEMINI_API_KEY (or the configured key) is set.
//!     let classifier = TypeClassifier::from_config(&config);
//!
//!     let place = PlaceCandidate::new("ลานกางเต็นท์ริมทะเลสาบ")
//!         .with_tags(["campground"]);
//!     let result = classifier.classify_type(&place).await;
//!     println!("{} ({:.2})", result.type_name(), result.confidence());
//! }
//! ```

pub mod heuristic;
pub mod keywords;
pub mod prompt;
pub mod provider;
pub mod reply;
pub mod service;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use heuristic::HeuristicClassifier;
pub use prompt::PromptBuilder;
pub use provider::{AiClassifier, AiError, ApiClassifier};
pub use reply::parse_reply;
pub use service::{Classification, ClassificationSource, TypeClassifier};
