//! Classification result types.
//!
//! The outcome is derived from the positive-class probability and a
//! [`DecisionThreshold`]; the model's own label is carried for display and
//! diagnostics only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary stroke outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Stroke predicted
    Positive,
    /// No stroke predicted
    Negative,
}

impl Outcome {
    /// Message shown after a successful classification.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Positive => "Stroke detected for this patient.",
            Self::Negative => "No stroke detected for this patient.",
        }
    }

    /// Label the classifier would use for this outcome.
    #[must_use]
    pub fn as_label(self) -> u8 {
        match self {
            Self::Positive => 1,
            Self::Negative => 0,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "STROKE"),
            Self::Negative => write!(f, "NO STROKE"),
        }
    }
}

/// Probability cutoff separating the two outcome classes.
///
/// Changing it from [`DecisionThreshold::DEFAULT`] changes the clinical
/// meaning of every decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DecisionThreshold(f64);

impl DecisionThreshold {
    pub const DEFAULT: Self = Self(0.5);

    /// Create a threshold strictly inside (0, 1).
    ///
    /// # Errors
    /// Returns error if the value is not finite or outside (0, 1).
    pub fn new(value: f64) -> Result<Self, String> {
        if !value.is_finite() || value <= 0.0 || value >= 1.0 {
            return Err(format!("Decision threshold {value} must be in (0, 1)"));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_default(self) -> bool {
        (self.0 - Self::DEFAULT.0).abs() < f64::EPSILON
    }

    /// `Positive` iff `probability_positive >= threshold`.
    #[must_use]
    pub fn decide(self, probability_positive: f64) -> Outcome {
        if probability_positive >= self.0 {
            Outcome::Positive
        } else {
            Outcome::Negative
        }
    }
}

impl TryFrom<f64> for DecisionThreshold {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DecisionThreshold> for f64 {
    fn from(threshold: DecisionThreshold) -> Self {
        threshold.0
    }
}

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of one classification, ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Raw class label returned by the model
    pub predicted_label: u8,

    /// Probability of the positive (stroke) class, 0.0 to 1.0
    pub probability_positive: f64,

    /// Thresholded outcome
    pub outcome: Outcome,

    /// Threshold applied for this decision
    pub threshold: f64,
}

impl ClassificationResult {
    /// Build a result by thresholding `probability_positive`.
    #[must_use]
    pub fn new(predicted_label: u8, probability_positive: f64, threshold: DecisionThreshold) -> Self {
        Self {
            predicted_label,
            probability_positive,
            outcome: threshold.decide(probability_positive),
            threshold: threshold.value(),
        }
    }

    /// Whether the model's own label matches the thresholded outcome.
    #[must_use]
    pub fn label_agrees(&self) -> bool {
        self.predicted_label == self.outcome.as_label()
    }

    /// Probability as a fraction, two decimals (`0.73`).
    #[must_use]
    pub fn probability_fraction(&self) -> String {
        format!("{:.2}", self.probability_positive)
    }

    /// Probability as a percentage, two decimals (`73.42`).
    #[must_use]
    pub fn probability_percent(&self) -> String {
        format!("{:.2}", self.probability_positive * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let t = DecisionThreshold::DEFAULT;
        assert_eq!(t.decide(0.5), Outcome::Positive);
        assert_eq!(t.decide(0.4999), Outcome::Negative);
        assert_eq!(t.decide(1.0), Outcome::Positive);
        assert_eq!(t.decide(0.0), Outcome::Negative);
    }

    #[test]
    fn test_threshold_range() {
        assert!(DecisionThreshold::new(0.0).is_err());
        assert!(DecisionThreshold::new(1.0).is_err());
        assert!(DecisionThreshold::new(f64::NAN).is_err());
        let t = DecisionThreshold::new(0.3).expect("valid");
        assert!(!t.is_default());
        assert_eq!(t.decide(0.35), Outcome::Positive);
        assert!(DecisionThreshold::default().is_default());
    }

    #[test]
    fn test_threshold_deserialization_checks_range() {
        let t: DecisionThreshold = serde_json::from_str("0.3").expect("valid threshold");
        assert!((t.value() - 0.3).abs() < f64::EPSILON);
        assert_eq!(serde_json::to_string(&t).expect("serialize"), "0.3");

        assert!(serde_json::from_str::<DecisionThreshold>("1.5").is_err());
        assert!(serde_json::from_str::<DecisionThreshold>("0.0").is_err());
        assert!(serde_json::from_str::<DecisionThreshold>("-0.2").is_err());
    }

    #[test]
    fn test_formatting() {
        let r = ClassificationResult::new(1, 0.734_21, DecisionThreshold::DEFAULT);
        assert_eq!(r.probability_fraction(), "0.73");
        assert_eq!(r.probability_percent(), "73.42");
        assert_eq!(r.outcome.message(), "Stroke detected for this patient.");
    }

    #[test]
    fn test_label_disagreement_keeps_threshold_outcome() {
        let r = ClassificationResult::new(0, 0.62, DecisionThreshold::DEFAULT);
        assert_eq!(r.outcome, Outcome::Positive);
        assert!(!r.label_agrees());

        let r = ClassificationResult::new(0, 0.12, DecisionThreshold::DEFAULT);
        assert!(r.label_agrees());
    }
}
