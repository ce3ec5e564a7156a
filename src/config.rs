//! Runtime configuration from `STROKEWATCH_*` environment variables.

use std::path::PathBuf;

use crate::domain::DecisionThreshold;
use crate::StrokewatchError;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory (or file) holding `svm_model.json`
    pub model_path: PathBuf,

    /// Load a model without `manifest.json`
    pub allow_unverified_model: bool,

    pub threshold: DecisionThreshold,

    pub log_mode: LogMode,

    pub log_file: PathBuf,

    /// Reset the session after this much inactivity; `None` disables expiry
    pub session_idle_timeout: Option<chrono::Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models"),
            allow_unverified_model: false,
            threshold: DecisionThreshold::DEFAULT,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("strokewatch.log"),
            session_idle_timeout: None,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES")
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns `StrokewatchError::Config` on malformed values.
    pub fn from_env() -> Result<Self, StrokewatchError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    ///
    /// # Errors
    /// Returns `StrokewatchError::Config` on malformed values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StrokewatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("STROKEWATCH_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }

        if let Some(v) = lookup("STROKEWATCH_ALLOW_UNVERIFIED_MODELS") {
            config.allow_unverified_model = parse_bool(&v);
        }

        if let Some(v) = lookup("STROKEWATCH_DECISION_THRESHOLD") {
            let value: f64 = v.trim().parse().map_err(|_| {
                StrokewatchError::Config(format!("STROKEWATCH_DECISION_THRESHOLD: not a number: {v:?}"))
            })?;
            config.threshold = DecisionThreshold::new(value).map_err(StrokewatchError::Config)?;
        }

        if let Some(v) = lookup("STROKEWATCH_LOG_MODE") {
            config.log_mode = match v.as_str() {
                "file" => LogMode::File,
                "stdout" => LogMode::Stdout,
                "auto" => LogMode::Auto,
                other => {
                    return Err(StrokewatchError::Config(format!(
                        "STROKEWATCH_LOG_MODE must be auto, file or stdout, got {other:?}"
                    )))
                }
            };
        }

        if let Some(path) = lookup("STROKEWATCH_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }

        if let Some(v) = lookup("STROKEWATCH_SESSION_IDLE_MINUTES") {
            let minutes: i64 = v.trim().parse().map_err(|_| {
                StrokewatchError::Config(format!(
                    "STROKEWATCH_SESSION_IDLE_MINUTES: not an integer: {v:?}"
                ))
            })?;
            config.session_idle_timeout = match minutes {
                0 => None,
                m if m > 0 => Some(chrono::Duration::minutes(m)),
                m => {
                    return Err(StrokewatchError::Config(format!(
                        "STROKEWATCH_SESSION_IDLE_MINUTES must be >= 0, got {m}"
                    )))
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).expect("defaults");
        assert!(config.threshold.is_default());
        assert_eq!(config.log_mode, LogMode::Auto);
        assert!(!config.allow_unverified_model);
        assert!(config.session_idle_timeout.is_none());
        assert_eq!(config.model_path, PathBuf::from("models"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("STROKEWATCH_MODEL_PATH", "/opt/models"),
            ("STROKEWATCH_ALLOW_UNVERIFIED_MODELS", "true"),
            ("STROKEWATCH_DECISION_THRESHOLD", "0.4"),
            ("STROKEWATCH_LOG_MODE", "stdout"),
            ("STROKEWATCH_SESSION_IDLE_MINUTES", "30"),
        ]))
        .expect("valid config");

        assert_eq!(config.model_path, PathBuf::from("/opt/models"));
        assert!(config.allow_unverified_model);
        assert!((config.threshold.value() - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.session_idle_timeout, Some(chrono::Duration::minutes(30)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(AppConfig::from_lookup(lookup_from(&[("STROKEWATCH_DECISION_THRESHOLD", "1.5")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("STROKEWATCH_DECISION_THRESHOLD", "half")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("STROKEWATCH_LOG_MODE", "syslog")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("STROKEWATCH_SESSION_IDLE_MINUTES", "-5")])).is_err());
    }
}
