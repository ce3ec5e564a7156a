//! Patient input types for stroke risk prediction.
//!
//! A [`PatientInput`] mirrors what the form collects and may be incomplete.
//! [`PatientInput::validate`] turns it into a [`ClinicalProfile`], the only
//! type the feature encoder accepts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Generic message shown to the user when the form is incomplete.
pub const INCOMPLETE_FORM_MESSAGE: &str = "Please fill in all fields of the form.";

/// Yes/No answer for the comorbidity and lifestyle questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Encoded value: `Yes` is 1, `No` is 0.
    #[must_use]
    pub fn as_feature(self) -> f64 {
        match self {
            Self::Yes => 1.0,
            Self::No => 0.0,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl FromStr for YesNo {
    type Err = TokenError;

    /// Exact, case-sensitive match on the recognized tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Oui" | "Yes" => Ok(Self::Yes),
            "Non" | "No" => Ok(Self::No),
            other => Err(TokenError(other.to_string())),
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Patient sex as collected by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Encoded value: `Male` is 1, `Female` is 0.
    #[must_use]
    pub fn as_feature(self) -> f64 {
        match self {
            Self::Male => 1.0,
            Self::Female => 0.0,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

impl FromStr for Sex {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Homme" | "Male" => Ok(Self::Male),
            "Femme" | "Female" => Ok(Self::Female),
            other => Err(TokenError(other.to_string())),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A selection token that matches none of the enumeration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized selection token: {0:?}")]
pub struct TokenError(pub String);

/// Rejection of an incomplete form submission.
///
/// `Display` never names fields; `missing` is for debug logging only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", INCOMPLETE_FORM_MESSAGE)]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

/// Raw patient input from one form submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientInput {
    /// Externally assigned identifier, free text.
    pub patient_id: String,

    /// Age in years.
    pub age: f64,

    pub hypertension_or_diabetes: Option<YesNo>,

    pub cardiopathy: Option<YesNo>,

    /// Body mass index (kg/m²).
    pub bmi: f64,

    pub sex: Option<Sex>,

    pub tobacco_or_alcohol_use: Option<YesNo>,
}

/// A complete patient input: every selection made, age and BMI positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalProfile {
    pub patient_id: String,
    pub age: f64,
    pub hypertension_or_diabetes: YesNo,
    pub cardiopathy: YesNo,
    pub bmi: f64,
    pub sex: Sex,
    pub tobacco_or_alcohol_use: YesNo,
}

impl PatientInput {
    /// Create an empty input for the given identifier.
    #[must_use]
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            ..Default::default()
        }
    }

    /// Whether the input satisfies the completeness invariant.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if !(self.age.is_finite() && self.age > 0.0) {
            missing.push("age");
        }
        if self.hypertension_or_diabetes.is_none() {
            missing.push("hypertension_or_diabetes");
        }
        if self.cardiopathy.is_none() {
            missing.push("cardiopathy");
        }
        if !(self.bmi.is_finite() && self.bmi > 0.0) {
            missing.push("bmi");
        }
        if self.sex.is_none() {
            missing.push("sex");
        }
        if self.tobacco_or_alcohol_use.is_none() {
            missing.push("tobacco_or_alcohol_use");
        }

        missing
    }

    /// Check completeness and produce a [`ClinicalProfile`].
    ///
    /// # Errors
    /// Returns [`ValidationError`] if `age` or `bmi` is not positive or any
    /// selection is unset.
    pub fn validate(&self) -> Result<ClinicalProfile, ValidationError> {
        match (
            self.hypertension_or_diabetes,
            self.cardiopathy,
            self.sex,
            self.tobacco_or_alcohol_use,
        ) {
            (Some(hypertension_or_diabetes), Some(cardiopathy), Some(sex), Some(tobacco))
                if self.is_complete() =>
            {
                Ok(ClinicalProfile {
                    patient_id: self.patient_id.clone(),
                    age: self.age,
                    hypertension_or_diabetes,
                    cardiopathy,
                    bmi: self.bmi,
                    sex,
                    tobacco_or_alcohol_use: tobacco,
                })
            }
            _ => Err(ValidationError {
                missing: self.missing_fields(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_input() -> PatientInput {
        PatientInput {
            patient_id: "P1".into(),
            age: 70.0,
            hypertension_or_diabetes: Some(YesNo::Yes),
            cardiopathy: Some(YesNo::No),
            bmi: 28.5,
            sex: Some(Sex::Male),
            tobacco_or_alcohol_use: Some(YesNo::Yes),
        }
    }

    #[test]
    fn test_tokens_are_exact() {
        assert_eq!("Oui".parse::<YesNo>(), Ok(YesNo::Yes));
        assert_eq!("Non".parse::<YesNo>(), Ok(YesNo::No));
        assert_eq!("Homme".parse::<Sex>(), Ok(Sex::Male));
        assert_eq!("Femme".parse::<Sex>(), Ok(Sex::Female));
        assert!("oui".parse::<YesNo>().is_err());
        assert!("HOMME".parse::<Sex>().is_err());
        assert!(" Yes".parse::<YesNo>().is_err());
    }

    #[test]
    fn test_complete_input_validates() {
        let profile = complete_input().validate().expect("Should validate");
        assert_eq!(profile.patient_id, "P1");
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.cardiopathy, YesNo::No);
    }

    #[test]
    fn test_non_positive_numbers_rejected() {
        let mut input = complete_input();
        input.age = 0.0;
        let err = input.validate().expect_err("age 0 must be rejected");
        assert_eq!(err.missing, vec!["age"]);

        let mut input = complete_input();
        input.bmi = -1.0;
        assert!(input.validate().is_err());

        let mut input = complete_input();
        input.bmi = f64::NAN;
        assert!(!input.is_complete());
    }

    #[test]
    fn test_unset_selection_rejected() {
        let mut input = complete_input();
        input.sex = None;
        input.cardiopathy = None;
        let err = input.validate().expect_err("must be rejected");
        assert_eq!(err.missing, vec!["cardiopathy", "sex"]);
    }

    #[test]
    fn test_validation_message_is_generic() {
        let err = PatientInput::new("P2").validate().expect_err("empty input");
        assert_eq!(err.to_string(), INCOMPLETE_FORM_MESSAGE);
        assert!(!err.to_string().contains("age"));
    }
}
