//! Classification service: Orchestrates the stroke risk decision.
//!
//! This service coordinates:
//! - Input validation
//! - Feature encoding
//! - Model invocation (label and probabilities)
//! - Threshold decision
//! - Session registry update

use std::sync::Arc;

use crate::adapters::svm::SvmClassifier;
use crate::config::AppConfig;
use crate::domain::{encode, ClassificationResult, DecisionThreshold, PatientInput, Session};
use crate::ports::{ModelError, StrokeClassifier};
use crate::StrokewatchError;

/// Service running the validate → encode → classify → record pipeline.
///
/// A submission either completes fully or fails with no effect on the
/// session: the registry is only touched after every model call succeeded.
pub struct ClassificationService<C>
where
    C: StrokeClassifier,
{
    classifier: Arc<C>,
    threshold: DecisionThreshold,
}

impl<C> ClassificationService<C>
where
    C: StrokeClassifier,
{
    /// Create a service using the default 0.5 threshold.
    pub fn new(classifier: Arc<C>) -> Self {
        Self {
            classifier,
            threshold: DecisionThreshold::DEFAULT,
        }
    }

    /// Replace the decision threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: DecisionThreshold) -> Self {
        if !threshold.is_default() {
            tracing::warn!(
                "Decision threshold overridden to {:.3} (default {:.1}); outcomes change clinical meaning",
                threshold.value(),
                DecisionThreshold::DEFAULT.value()
            );
        }
        self.threshold = threshold;
        self
    }

    /// Classify one submission and record the patient in the session registry.
    ///
    /// # Errors
    /// Returns `StrokewatchError::Validation` for incomplete input (no model
    /// call is made) and `StrokewatchError::Inference` if the model fails.
    /// In both cases `session` is left unchanged.
    pub fn classify_and_record(
        &self,
        input: &PatientInput,
        session: &mut Session,
    ) -> Result<ClassificationResult, StrokewatchError> {
        let profile = input.validate().map_err(|e| {
            tracing::debug!("Rejected incomplete submission, missing: {:?}", e.missing);
            e
        })?;

        tracing::debug!("Encoding clinical profile...");
        let features = encode(&profile);

        tracing::debug!("Invoking classifier...");
        let predicted_label = self.classifier.predict(&features)?;
        let [_, probability_positive] = self.classifier.predict_proba(&features)?;
        if !probability_positive.is_finite() {
            return Err(ModelError::NonFinite.into());
        }
        if !(0.0..=1.0).contains(&probability_positive) {
            return Err(ModelError::ProbabilityOutOfRange(probability_positive).into());
        }

        let result = ClassificationResult::new(predicted_label, probability_positive, self.threshold);

        if !result.label_agrees() {
            tracing::warn!(
                "Model label {} disagrees with thresholded outcome {} (p={:.4}, threshold={:.2})",
                result.predicted_label,
                result.outcome,
                result.probability_positive,
                result.threshold
            );
        }

        session
            .registry_mut()
            .record(result.outcome, profile.patient_id);
        session.touch();

        tracing::info!(
            "Classification complete: outcome={}, probability={:.2}%, positives={}, negatives={}",
            result.outcome,
            result.probability_positive * 100.0,
            session.registry().positive_ids().len(),
            session.registry().negative_ids().len()
        );

        Ok(result)
    }
}

impl ClassificationService<SvmClassifier> {
    /// Build the service from configuration, loading and verifying the model.
    ///
    /// # Errors
    /// Returns `StrokewatchError::ModelUnavailable` if the model cannot be
    /// loaded or verified.
    pub fn from_config(config: &AppConfig) -> Result<Self, StrokewatchError> {
        if !config.model_path.exists() {
            return Err(StrokewatchError::ModelUnavailable(format!(
                "Model path not found at {:?}. Set STROKEWATCH_MODEL_PATH to a directory containing svm_model.json.",
                config.model_path
            )));
        }

        let classifier = SvmClassifier::load(&config.model_path, config.allow_unverified_model)
            .map_err(|e| StrokewatchError::ModelUnavailable(e.to_string()))?;

        Ok(Self::new(Arc::new(classifier)).with_threshold(config.threshold))
    }
}
