//! # Strokewatch
//!
//! Stroke risk classification for a single patient at a time, with a
//! session-scoped registry of classified patient identifiers.
//!
//! This crate provides:
//! - Validation and fixed-order feature encoding of clinical inputs
//! - Threshold-based decisions on a pre-trained SVM's probability
//! - A terminal UI for form entry and the session dashboard
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientInput, FeatureVector, Session)
//! - `ports`: Trait definitions for external operations (the classifier)
//! - `adapters`: Concrete implementations (SVM evaluation, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{ClassificationResult, FeatureVector, Outcome, PatientInput, Session};

/// Result type for Strokewatch operations
pub type Result<T> = std::result::Result<T, StrokewatchError>;

/// Main error type for Strokewatch
#[derive(Debug, thiserror::Error)]
pub enum StrokewatchError {
    #[error(transparent)]
    Validation(#[from] domain::ValidationError),

    #[error("Inference failed: {0}")]
    Inference(#[from] ports::ModelError),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl StrokewatchError {
    /// Message suitable for the user-facing display surface.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => domain::INCOMPLETE_FORM_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
