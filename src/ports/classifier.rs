//! Classifier port: Trait for the pre-trained stroke model.
//!
//! This trait abstracts the model runtime from the application logic.

use crate::domain::FeatureVector;

/// Errors raised while invoking the classifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Model not loaded")]
    NotLoaded,

    #[error("Feature count mismatch: expected {expected}, got {got}")]
    FeatureCountMismatch { expected: usize, got: usize },

    #[error("Model produced a non-finite value")]
    NonFinite,

    #[error("Model probability {0} outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),
}

/// Trait for binary stroke classifiers.
///
/// Implementations must be pure: the same vector always yields the same
/// label and probabilities. Each call scores one row of
/// [`FEATURE_COUNT`](crate::domain::FEATURE_COUNT) features.
pub trait StrokeClassifier: Send + Sync {
    /// Raw class label (0 = no stroke, 1 = stroke).
    ///
    /// # Errors
    /// Returns [`ModelError`] if the model cannot score the vector.
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError>;

    /// Class-membership probabilities `[p_negative, p_positive]`.
    ///
    /// # Errors
    /// Returns [`ModelError`] if the model cannot score the vector.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError>;
}
