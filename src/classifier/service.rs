//! Two-stage orchestrator: heuristic first, AI only when unsure.
//!
//! [`TypeClassifier`] always runs the [`HeuristicClassifier`].  When its
//! confidence is below the threshold and an [`AiClassifier`] is configured,
//! the AI stage is consulted; any AI error falls back to the heuristic
//! result with a warning.  [`TypeClassifier::classify_type`] therefore never
//! fails.
//!
//! ```text
//! Start ──heuristic──▶ HeuristicDone ──confidence ≥ threshold──▶ Done (heuristic)
//!                                    ──confidence < threshold──▶ AI ──Ok──▶ Done (ai)
//!                                                                   ──Err─▶ Done (fallback)
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::classifier::heuristic::HeuristicClassifier;
use crate::classifier::provider::{AiClassifier, ApiClassifier};
use crate::config::AppConfig;
use crate::place::PlaceCandidate;
use crate::taxonomy::ClassificationResult;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Which path produced a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationSource {
    /// Heuristic confidence met the threshold, or no AI stage is configured.
    Heuristic,
    /// The AI stage returned a valid reply.
    Ai,
    /// The AI stage failed; the heuristic result was kept.
    HeuristicFallback { reason: String },
}

/// A result plus the path that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub result: ClassificationResult,
    pub source: ClassificationSource,
}

// ---------------------------------------------------------------------------
// TypeClassifier
// ---------------------------------------------------------------------------

/// Public entry point for campsite type classification.
///
/// Cheap to share: wrap in `Arc` or clone (the AI stage is behind `Arc`).
///
/// # Example
/// ```rust
/// use campsite_classifier::classifier::TypeClassifier;
/// use campsite_classifier::place::PlaceCandidate;
///
/// #[tokio::main]
/// async fn main() {
///     let classifier = TypeClassifier::heuristic_only();
///     let place = PlaceCandidate::new("Khao Yai Camping").with_tags(["campground"]);
///     let result = classifier.classify_type(&place).await;
///     assert_eq!(result.type_id(), 1);
/// }
/// ```
#[derive(Clone)]
pub struct TypeClassifier {
    heuristic: HeuristicClassifier,
    ai: Option<Arc<dyn AiClassifier>>,
    threshold: f64,
}

impl TypeClassifier {
    /// Build with an explicit AI stage (or `None`) and threshold.
    pub fn new(ai: Option<Arc<dyn AiClassifier>>, threshold: f64) -> Self {
        Self {
            heuristic: HeuristicClassifier::new(),
            ai,
            threshold,
        }
    }

    /// Heuristic stage only, default threshold.
    pub fn heuristic_only() -> Self {
        Self::new(None, AppConfig::default().classifier.confidence_threshold)
    }

    /// Build from config.  The AI stage is created only when it is enabled
    /// and an API key resolves; otherwise every call is heuristic-only.
    pub fn from_config(config: &AppConfig) -> Self {
        let ai: Option<Arc<dyn AiClassifier>> = match ApiClassifier::from_config(&config.ai) {
            Some(api) => {
                log::info!(
                    "AI stage enabled ({:?}, model {})",
                    config.ai.provider,
                    config.ai.model
                );
                Some(Arc::new(api) as Arc<dyn AiClassifier>)
            }
            None => {
                log::info!(
                    "AI stage disabled (no API key in ${} or settings); heuristic only",
                    config.ai.api_key_env
                );
                None
            }
        };
        Self::new(ai, config.classifier.confidence_threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn has_ai_stage(&self) -> bool {
        self.ai.is_some()
    }

    /// Classify `place`, reporting which path produced the result.
    pub async fn classify(&self, place: &PlaceCandidate) -> Classification {
        let heuristic = self.heuristic.classify(place);

        if heuristic.confidence() >= self.threshold {
            return Classification {
                result: heuristic,
                source: ClassificationSource::Heuristic,
            };
        }

        let Some(ai) = &self.ai else {
            return Classification {
                result: heuristic,
                source: ClassificationSource::Heuristic,
            };
        };

        match ai.classify(place, Some(&heuristic)).await {
            Ok(result) => {
                log::debug!(
                    "AI classified {:?} as {} ({:.2}); heuristic said {} ({:.2})",
                    place.name,
                    result.type_name(),
                    result.confidence(),
                    heuristic.type_name(),
                    heuristic.confidence()
                );
                Classification {
                    result,
                    source: ClassificationSource::Ai,
                }
            }
            Err(err) => {
                log::warn!(
                    "AI classification failed for {:?}; using heuristic {} ({:.2}): {err}",
                    place.name,
                    heuristic.type_name(),
                    heuristic.confidence()
                );
                Classification {
                    result: heuristic,
                    source: ClassificationSource::HeuristicFallback {
                        reason: err.to_string(),
                    },
                }
            }
        }
    }

    /// Classify `place`.  Never fails.
    pub async fn classify_type(&self, place: &PlaceCandidate) -> ClassificationResult {
        self.classify(place).await.result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::provider::AiError;
    use crate::taxonomy::CampsiteType;
    use async_trait::async_trait;
    use log::{Level, LevelFilter};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, Once};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Always succeeds with a fixed result and counts calls.
    struct AlwaysOk {
        result: ClassificationResult,
        calls: AtomicUsize,
    }

    impl AlwaysOk {
        fn new(ty: CampsiteType, confidence: f64) -> Arc<Self> {
            Arc::new(Self {
                result: ClassificationResult::new(ty, confidence),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AiClassifier for AlwaysOk {
        async fn classify(
            &self,
            _place: &PlaceCandidate,
            _hint: Option<&ClassificationResult>,
        ) -> Result<ClassificationResult, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result)
        }
    }

    enum AiErrorKind {
        Request,
        Timeout,
        Parse,
        Empty,
        Invalid,
        RateLimited,
        Auth,
    }

    /// Always returns the given error.
    struct AlwaysFails(AiErrorKind);

    #[async_trait]
    impl AiClassifier for AlwaysFails {
        async fn classify(
            &self,
            _place: &PlaceCandidate,
            _hint: Option<&ClassificationResult>,
        ) -> Result<ClassificationResult, AiError> {
            Err(match self.0 {
                AiErrorKind::Request => AiError::Request("connection refused".into()),
                AiErrorKind::Timeout => AiError::Timeout,
                AiErrorKind::Parse => AiError::Parse("bad json".into()),
                AiErrorKind::Empty => AiError::EmptyResponse,
                AiErrorKind::Invalid => AiError::InvalidReply("typeId out of range: 9".into()),
                AiErrorKind::RateLimited => AiError::RateLimited,
                AiErrorKind::Auth => AiError::Auth(401),
            })
        }
    }

    fn stage(ai: Arc<impl AiClassifier + 'static>) -> Option<Arc<dyn AiClassifier>> {
        let ai: Arc<dyn AiClassifier> = ai;
        Some(ai)
    }

    /// Records every log line so tests can count warnings per place.
    struct CaptureLogger {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            if let Ok(mut records) = self.records.lock() {
                records.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: CaptureLogger = CaptureLogger {
        records: Mutex::new(Vec::new()),
    };

    /// Warnings logged so far that mention `name`.
    fn warnings_for(name: &str) -> usize {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            let _ = log::set_logger(&CAPTURE);
            log::set_max_level(LevelFilter::Trace);
        });
        CAPTURE
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, msg)| *level == Level::Warn && msg.contains(name))
            .count()
    }

    fn low_signal() -> PlaceCandidate {
        PlaceCandidate::new("Phu Chi Fa Viewpoint").with_tags(["point_of_interest"])
    }

    fn strong_signal() -> PlaceCandidate {
        PlaceCandidate::new("Khao Yai Camping").with_tags(["campground"])
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn confident_heuristic_skips_ai() {
        let ai = AlwaysOk::new(CampsiteType::Bungalow, 0.99);
        let classifier = TypeClassifier::new(stage(ai.clone()), 0.7);

        let c = classifier.classify(&strong_signal()).await;
        assert_eq!(c.source, ClassificationSource::Heuristic);
        assert_eq!(c.result.campsite_type(), CampsiteType::Camping);
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn low_confidence_uses_ai_reply_exactly() {
        let ai = AlwaysOk::new(CampsiteType::TentedResort, 0.83);
        let classifier = TypeClassifier::new(stage(ai.clone()), 0.7);

        let c = classifier.classify(&low_signal()).await;
        assert_eq!(c.source, ClassificationSource::Ai);
        assert_eq!(c.result, ClassificationResult::new(CampsiteType::TentedResort, 0.83));
        assert_eq!(ai.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn ai_failure_falls_back_to_heuristic() {
        let heuristic = HeuristicClassifier::new().classify(&low_signal());
        for kind in [
            AiErrorKind::Request,
            AiErrorKind::Timeout,
            AiErrorKind::Parse,
            AiErrorKind::Empty,
            AiErrorKind::Invalid,
            AiErrorKind::RateLimited,
            AiErrorKind::Auth,
        ] {
            let classifier = TypeClassifier::new(stage(Arc::new(AlwaysFails(kind))), 0.7);
            let c = classifier.classify(&low_signal()).await;
            assert_eq!(c.result, heuristic);
            assert!(matches!(
                c.source,
                ClassificationSource::HeuristicFallback { .. }
            ));
        }
    }

    #[tokio::test]
    async fn fallback_logs_exactly_one_warning() {
        let name = "Pha Daeng Fallback Lookout";
        assert_eq!(warnings_for(name), 0);

        let place = PlaceCandidate::new(name).with_tags(["point_of_interest"]);
        let classifier =
            TypeClassifier::new(stage(Arc::new(AlwaysFails(AiErrorKind::Timeout))), 0.7);
        let c = classifier.classify(&place).await;

        assert!(matches!(c.source, ClassificationSource::HeuristicFallback { .. }));
        assert_eq!(warnings_for(name), 1);
    }

    #[tokio::test]
    async fn ai_and_heuristic_paths_log_no_warning() {
        let ai_name = "Huai Nam Dang Model Lookout";
        let ai_place = PlaceCandidate::new(ai_name).with_tags(["point_of_interest"]);
        let ok = TypeClassifier::new(stage(AlwaysOk::new(CampsiteType::Glamping, 0.8)), 0.7);
        warnings_for(ai_name);
        assert_eq!(ok.classify(&ai_place).await.source, ClassificationSource::Ai);
        assert_eq!(warnings_for(ai_name), 0);

        let heuristic_name = "Sai Yok Quiet Camping";
        let heuristic_place = PlaceCandidate::new(heuristic_name).with_tags(["campground"]);
        let failing =
            TypeClassifier::new(stage(Arc::new(AlwaysFails(AiErrorKind::Request))), 0.7);
        assert_eq!(
            failing.classify(&heuristic_place).await.source,
            ClassificationSource::Heuristic
        );
        assert_eq!(warnings_for(heuristic_name), 0);
    }

    #[tokio::test]
    async fn fallback_reason_names_the_error() {
        let classifier =
            TypeClassifier::new(stage(Arc::new(AlwaysFails(AiErrorKind::Timeout))), 0.7);
        let c = classifier.classify(&low_signal()).await;
        assert_eq!(
            c.source,
            ClassificationSource::HeuristicFallback {
                reason: "AI request timed out".into()
            }
        );
    }

    #[tokio::test]
    async fn no_ai_stage_returns_heuristic() {
        let classifier = TypeClassifier::heuristic_only();
        assert!(!classifier.has_ai_stage());
        let c = classifier.classify(&low_signal()).await;
        assert_eq!(c.source, ClassificationSource::Heuristic);
        assert_eq!(c.result.campsite_type(), CampsiteType::Camping);
        assert!(c.result.confidence() < classifier.threshold());
    }

    #[tokio::test]
    async fn threshold_is_strict_lower_bound() {
        // Campground tag only: heuristic confidence exactly 0.5.
        let place = PlaceCandidate::new("Baan Suan").with_tags(["campground"]);
        let ai = AlwaysOk::new(CampsiteType::Glamping, 0.9);

        let at = TypeClassifier::new(stage(ai.clone()), 0.5);
        assert_eq!(at.classify(&place).await.source, ClassificationSource::Heuristic);

        let above = TypeClassifier::new(stage(ai.clone()), 0.51);
        assert_eq!(above.classify(&place).await.source, ClassificationSource::Ai);
    }

    #[tokio::test]
    async fn classify_type_never_fails_and_is_repeatable() {
        let classifier =
            TypeClassifier::new(stage(Arc::new(AlwaysFails(AiErrorKind::Request))), 0.7);
        let a = classifier.classify_type(&strong_signal()).await;
        let b = classifier.classify_type(&strong_signal()).await;
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn from_config_without_key_has_no_ai_stage() {
        let mut config = AppConfig::default();
        config.ai.api_key_env = "CAMPSITE_CLASSIFIER_TEST_NEVER_SET".into();
        config.ai.api_key = None;
        let classifier = TypeClassifier::from_config(&config);
        assert!(!classifier.has_ai_stage());
        assert_eq!(classifier.threshold(), 0.7);
    }

    #[test]
    fn from_config_with_key_has_ai_stage() {
        let mut config = AppConfig::default();
        config.ai.api_key_env = "CAMPSITE_CLASSIFIER_TEST_NEVER_SET".into();
        config.ai.api_key = Some("key".into());
        assert!(TypeClassifier::from_config(&config).has_ai_stage());

        config.ai.enabled = false;
        assert!(!TypeClassifier::from_config(&config).has_ai_stage());
    }

    #[test]
    fn classifier_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypeClassifier>();
    }
}
