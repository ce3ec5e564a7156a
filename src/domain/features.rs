//! Feature encoding for the stroke classifier.
//!
//! The vector layout is a binding contract with the trained model:
//! `[age, hta_diabete, cardiopathie, bmi, sexe, tabac_alcool, 1, 1]`.
//! Values are passed raw; the model was trained on un-normalized inputs.

use serde::{Deserialize, Serialize};

use super::patient::ClinicalProfile;

/// Number of features expected by the classifier.
pub const FEATURE_COUNT: usize = 8;

/// Value of the two trailing padding features.
pub const PADDING_VALUE: f64 = 1.0;

/// Feature names in model order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "hta_diabete",
    "cardiopathie",
    "imc",
    "sexe_encoded",
    "tabac_alcool_encoded",
    "padding_0",
    "padding_1",
];

/// Fixed-order numeric input row for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap raw values already in model order.
    #[must_use]
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Encode a complete profile into the classifier's feature layout.
#[must_use]
pub fn encode(profile: &ClinicalProfile) -> FeatureVector {
    FeatureVector([
        profile.age,
        profile.hypertension_or_diabetes.as_feature(),
        profile.cardiopathy.as_feature(),
        profile.bmi,
        profile.sex.as_feature(),
        profile.tobacco_or_alcohol_use.as_feature(),
        PADDING_VALUE,
        PADDING_VALUE,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patient::{PatientInput, Sex, YesNo};

    fn profile(
        age: f64,
        hta: &str,
        cardio: &str,
        bmi: f64,
        sex: &str,
        tobacco: &str,
    ) -> ClinicalProfile {
        PatientInput {
            patient_id: "P".into(),
            age,
            hypertension_or_diabetes: Some(hta.parse().expect("token")),
            cardiopathy: Some(cardio.parse().expect("token")),
            bmi,
            sex: Some(sex.parse().expect("token")),
            tobacco_or_alcohol_use: Some(tobacco.parse().expect("token")),
        }
        .validate()
        .expect("Should validate")
    }

    #[test]
    fn test_reference_patient_encoding() {
        let p1 = profile(70.0, "Oui", "Non", 28.5, "Homme", "Oui");
        let v = encode(&p1);
        assert_eq!(v.as_slice(), &[70.0, 1.0, 0.0, 28.5, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_negative_tokens_encode_to_zero() {
        let p = profile(45.0, "Non", "Non", 22.0, "Femme", "Non");
        let v = encode(&p);
        assert_eq!(v.as_slice(), &[45.0, 0.0, 0.0, 22.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let p = ClinicalProfile {
            patient_id: "P9".into(),
            age: 61.0,
            hypertension_or_diabetes: YesNo::No,
            cardiopathy: YesNo::Yes,
            bmi: 31.27,
            sex: Sex::Female,
            tobacco_or_alcohol_use: YesNo::Yes,
        };
        let first = encode(&p);
        let second = encode(&p);
        assert_eq!(first, second);
        assert_eq!(first.as_slice().len(), FEATURE_COUNT);
        assert_eq!(first.as_slice().len(), FEATURE_NAMES.len());
    }
}
