//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: patient input and validation, feature encoding,
//! classification results and session state.

mod classification;
pub mod features;
mod patient;
mod session;

pub use classification::{ClassificationResult, DecisionThreshold, Outcome};
pub use features::{encode, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use patient::{
    ClinicalProfile, PatientInput, Sex, TokenError, ValidationError, YesNo,
    INCOMPLETE_FORM_MESSAGE,
};
pub use session::{DashboardVisibility, PatientRegistry, Session};
