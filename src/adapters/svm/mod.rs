//! SVM adapter: Implementation of StrokeClassifier for an exported SVM.
//!
//! The training pipeline exports a kernel SVM with Platt scaling as JSON
//! (`svm_model.json`). This adapter evaluates it in plain Rust:
//!
//! - decision value `f(x) = Σ dual_coef_i · K(sv_i, x) + intercept`
//! - label `classes[1]` if `f(x) > 0`, else `classes[0]`
//! - `p_positive = 1 / (1 + exp(prob_a · f(x) + prob_b))`
//!
//! # Integrity
//!
//! A `manifest.json` next to the artifact binds it by SHA-256. When the
//! manifest is missing the model is refused unless unverified loading was
//! explicitly allowed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{ModelError, StrokeClassifier};

/// File name of the exported model inside the model directory.
pub const MODEL_FILE: &str = "svm_model.json";

/// File name of the integrity manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Kernel function of the exported SVM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    Rbf,
    Poly,
    Sigmoid,
}

/// SVM parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedSvmModel {
    pub kernel: Kernel,
    #[serde(default)]
    pub gamma: f64,
    #[serde(default)]
    pub coef0: f64,
    #[serde(default = "default_degree")]
    pub degree: i32,
    pub feature_names: Vec<String>,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    pub prob_a: f64,
    pub prob_b: f64,
    pub classes: [u8; 2],
}

fn default_degree() -> i32 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelManifest {
    version: u32,
    files: BTreeMap<String, String>,
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// Constant-time compare for ASCII strings (SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Kernel SVM classifier with Platt-scaled probabilities.
#[derive(Debug, Clone)]
pub struct SvmClassifier {
    model: ExportedSvmModel,
}

impl SvmClassifier {
    /// Wrap an in-memory model after checking its shape.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` if the model does not match the
    /// feature layout or has inconsistent parameters.
    pub fn from_model(model: ExportedSvmModel) -> Result<Self, ModelError> {
        Self::check_model(&model)?;
        Ok(Self { model })
    }

    /// Load and verify the model from a directory (or a direct file path).
    ///
    /// # Errors
    /// Returns `ModelError::InvalidArtifact` if the file is missing, fails
    /// verification, or cannot be parsed.
    pub fn load(model_path: &Path, allow_unverified: bool) -> Result<Self, ModelError> {
        let (base_dir, model_file) = if model_path.is_file() {
            (
                model_path.parent().unwrap_or(model_path).to_path_buf(),
                model_path.to_path_buf(),
            )
        } else {
            (model_path.to_path_buf(), model_path.join(MODEL_FILE))
        };

        let bytes = std::fs::read(&model_file).map_err(|e| {
            ModelError::InvalidArtifact(format!("Failed to read {model_file:?}: {e}"))
        })?;

        Self::verify_manifest(&base_dir, &model_file, &bytes, allow_unverified)?;

        let model: ExportedSvmModel = serde_json::from_slice(&bytes)
            .map_err(|e| ModelError::InvalidArtifact(format!("Invalid model JSON: {e}")))?;
        let classifier = Self::from_model(model)?;

        tracing::info!(
            "Loaded SVM model from {:?} (kernel={:?}, support_vectors={})",
            model_file,
            classifier.model.kernel,
            classifier.model.support_vectors.len()
        );

        Ok(classifier)
    }

    fn verify_manifest(
        base_dir: &Path,
        model_file: &Path,
        model_bytes: &[u8],
        allow_unverified: bool,
    ) -> Result<(), ModelError> {
        let manifest_path: PathBuf = base_dir.join(MANIFEST_FILE);

        if !manifest_path.exists() {
            if allow_unverified {
                tracing::warn!(
                    "Loading UNVERIFIED model: no {} found in {:?}",
                    MANIFEST_FILE,
                    base_dir
                );
                return Ok(());
            }
            return Err(ModelError::InvalidArtifact(format!(
                "{MANIFEST_FILE} not found in {base_dir:?}; refusing to load an unverified model"
            )));
        }

        let content = std::fs::read(&manifest_path).map_err(|e| {
            ModelError::InvalidArtifact(format!("Failed to read manifest: {e}"))
        })?;
        let manifest: ModelManifest = serde_json::from_slice(&content).map_err(|e| {
            ModelError::InvalidArtifact(format!("Invalid {MANIFEST_FILE} format: {e}"))
        })?;
        if manifest.version != 1 {
            return Err(ModelError::InvalidArtifact(format!(
                "Unsupported manifest version {}",
                manifest.version
            )));
        }

        let file_name = model_file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ModelError::InvalidArtifact("Model path has no file name".into()))?;
        let expected = manifest.files.get(file_name).ok_or_else(|| {
            ModelError::InvalidArtifact(format!("{file_name} is not bound by {MANIFEST_FILE}"))
        })?;

        let actual = sha256_hex_bytes(model_bytes);
        if !constant_time_eq_str(&actual, &expected.to_ascii_lowercase()) {
            return Err(ModelError::InvalidArtifact(format!(
                "SHA-256 mismatch for {file_name}"
            )));
        }

        tracing::debug!("Model digest verified against {:?}", manifest_path);
        Ok(())
    }

    fn check_model(model: &ExportedSvmModel) -> Result<(), ModelError> {
        if model.feature_names.len() != FEATURE_COUNT {
            return Err(ModelError::InvalidArtifact(format!(
                "Model expects {} features, encoder produces {FEATURE_COUNT}",
                model.feature_names.len()
            )));
        }
        if let Some((i, (got, want))) = model
            .feature_names
            .iter()
            .zip(FEATURE_NAMES.iter())
            .enumerate()
            .find(|(_, (got, want))| got.as_str() != **want)
        {
            return Err(ModelError::InvalidArtifact(format!(
                "Feature {i} is {got:?}, expected {want:?}"
            )));
        }
        if model.support_vectors.is_empty() {
            return Err(ModelError::InvalidArtifact("No support vectors".into()));
        }
        if model.support_vectors.len() != model.dual_coef.len() {
            return Err(ModelError::InvalidArtifact(
                "dual_coef length does not match support_vectors".into(),
            ));
        }
        if model
            .support_vectors
            .iter()
            .any(|sv| sv.len() != FEATURE_COUNT)
        {
            return Err(ModelError::InvalidArtifact(format!(
                "Every support vector must have {FEATURE_COUNT} values"
            )));
        }
        if model.kernel != Kernel::Linear && !(model.gamma.is_finite() && model.gamma > 0.0) {
            return Err(ModelError::InvalidArtifact(format!(
                "gamma must be > 0 for {:?} kernel",
                model.kernel
            )));
        }
        if model.kernel == Kernel::Poly && model.degree < 1 {
            return Err(ModelError::InvalidArtifact("degree must be >= 1".into()));
        }
        if !(model.intercept.is_finite() && model.prob_a.is_finite() && model.prob_b.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "intercept and Platt coefficients must be finite".into(),
            ));
        }
        Ok(())
    }

    fn kernel(&self, sv: &[f64], x: &[f64]) -> f64 {
        let m = &self.model;
        let dot = || sv.iter().zip(x).map(|(a, b)| a * b).sum::<f64>();
        match m.kernel {
            Kernel::Linear => dot(),
            Kernel::Rbf => {
                let sq: f64 = sv.iter().zip(x).map(|(a, b)| (a - b) * (a - b)).sum();
                (-m.gamma * sq).exp()
            }
            Kernel::Poly => (m.gamma * dot() + m.coef0).powi(m.degree),
            Kernel::Sigmoid => (m.gamma * dot() + m.coef0).tanh(),
        }
    }

    /// Signed distance to the separating surface (positive means stroke).
    ///
    /// # Errors
    /// Returns `ModelError::NonFinite` on non-finite input or output.
    pub fn decision_function(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let x = features.as_slice();
        if x.len() != FEATURE_COUNT {
            return Err(ModelError::FeatureCountMismatch {
                expected: FEATURE_COUNT,
                got: x.len(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        let value = self
            .model
            .support_vectors
            .iter()
            .zip(&self.model.dual_coef)
            .map(|(sv, alpha)| alpha * self.kernel(sv, x))
            .sum::<f64>()
            + self.model.intercept;

        if !value.is_finite() {
            return Err(ModelError::NonFinite);
        }
        Ok(value)
    }

    /// Platt sigmoid, written to avoid overflow for large |A·f + B|.
    fn platt_probability(&self, decision: f64) -> f64 {
        let f_apb = decision * self.model.prob_a + self.model.prob_b;
        if f_apb >= 0.0 {
            let e = (-f_apb).exp();
            e / (1.0 + e)
        } else {
            1.0 / (1.0 + f_apb.exp())
        }
    }
}

impl StrokeClassifier for SvmClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<u8, ModelError> {
        let decision = self.decision_function(features)?;
        let [negative, positive] = self.model.classes;
        Ok(if decision > 0.0 { positive } else { negative })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelError> {
        let decision = self.decision_function(features)?;
        let p_positive = self.platt_probability(decision);

        if !p_positive.is_finite() {
            return Err(ModelError::NonFinite);
        }
        if !(0.0..=1.0).contains(&p_positive) {
            return Err(ModelError::ProbabilityOutOfRange(p_positive));
        }

        tracing::debug!("SVM decision={:.4}, p_positive={:.4}", decision, p_positive);
        Ok([1.0 - p_positive, p_positive])
    }
}
