//! Session-scoped state: the patient registry and dashboard visibility.
//!
//! A [`Session`] is created on session start and passed by `&mut` to the
//! classification service. Nothing here is global; two sessions never share
//! state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::classification::Outcome;

/// Patient identifiers grouped by outcome, in submission order.
///
/// Append-only: no deduplication and no removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRegistry {
    positive_ids: Vec<String>,
    negative_ids: Vec<String>,
}

impl PatientRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `patient_id` to the list matching `outcome`.
    pub(crate) fn record(&mut self, outcome: Outcome, patient_id: impl Into<String>) {
        match outcome {
            Outcome::Positive => self.positive_ids.push(patient_id.into()),
            Outcome::Negative => self.negative_ids.push(patient_id.into()),
        }
    }

    /// Identifiers classified as stroke.
    #[must_use]
    pub fn positive_ids(&self) -> &[String] {
        &self.positive_ids
    }

    /// Identifiers classified as no stroke.
    #[must_use]
    pub fn negative_ids(&self) -> &[String] {
        &self.negative_ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positive_ids.len() + self.negative_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which registry lists the dashboard shows.
///
/// Each flag only moves from hidden to shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardVisibility {
    show_positive_list: bool,
    show_negative_list: bool,
}

impl DashboardVisibility {
    #[must_use]
    pub fn show_positive_list(&self) -> bool {
        self.show_positive_list
    }

    #[must_use]
    pub fn show_negative_list(&self) -> bool {
        self.show_negative_list
    }

    pub(crate) fn reveal_positive(&mut self) {
        self.show_positive_list = true;
    }

    pub(crate) fn reveal_negative(&mut self) {
        self.show_negative_list = true;
    }
}

/// One interactive user context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Random identifier (UUID v4 format)
    pub id: String,

    registry: PatientRegistry,

    visibility: DashboardVisibility,

    /// When this session started
    pub started_at: DateTime<Utc>,

    /// Last user interaction
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Start a fresh session with empty registries and hidden lists.
    #[must_use]
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            id: uuid_v4(),
            registry: PatientRegistry::new(),
            visibility: DashboardVisibility::default(),
            started_at: now,
            last_activity: now,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &PatientRegistry {
        &self.registry
    }

    #[must_use]
    pub fn visibility(&self) -> DashboardVisibility {
        self.visibility
    }

    pub(crate) fn registry_mut(&mut self) -> &mut PatientRegistry {
        &mut self.registry
    }

    /// Show the stroke list from now on. Idempotent.
    pub fn reveal_positive_list(&mut self) {
        self.visibility.reveal_positive();
        self.touch();
    }

    /// Show the no-stroke list from now on. Idempotent.
    pub fn reveal_negative_list(&mut self) {
        self.visibility.reveal_negative();
        self.touch();
    }

    /// Record user activity.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Whether the session has been idle longer than `idle_timeout`.
    #[must_use]
    pub fn is_expired(&self, idle_timeout: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_activity) > idle_timeout
    }

    /// Replace this session with a fresh one (new id, empty state).
    pub fn reset(&mut self) {
        *self = Self::start();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::start()
    }
}

/// Generate a UUID v4 string using a CSPRNG seeded from OS entropy.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keeps_insertion_order_and_duplicates() {
        let mut registry = PatientRegistry::new();
        registry.record(Outcome::Positive, "B");
        registry.record(Outcome::Positive, "A");
        registry.record(Outcome::Negative, "C");
        registry.record(Outcome::Positive, "B");

        assert_eq!(registry.positive_ids(), ["B", "A", "B"]);
        assert_eq!(registry.negative_ids(), ["C"]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_visibility_is_monotonic() {
        let mut session = Session::start();
        assert!(!session.visibility().show_positive_list());
        assert!(!session.visibility().show_negative_list());

        session.reveal_positive_list();
        session.reveal_positive_list();
        assert!(session.visibility().show_positive_list());
        assert!(!session.visibility().show_negative_list());

        session.reveal_negative_list();
        assert!(session.visibility().show_positive_list());
        assert!(session.visibility().show_negative_list());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut session = Session::start();
        let old_id = session.id.clone();
        session.registry_mut().record(Outcome::Negative, "P1");
        session.reveal_negative_list();

        session.reset();
        assert!(session.registry().is_empty());
        assert!(!session.visibility().show_negative_list());
        assert_ne!(session.id, old_id);
    }

    #[test]
    fn test_expiry() {
        let session = Session::start();
        let timeout = Duration::minutes(30);
        assert!(!session.is_expired(timeout, session.last_activity + Duration::minutes(10)));
        assert!(session.is_expired(timeout, session.last_activity + Duration::minutes(31)));
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = Session::start();
        let b = Session::start();
        a.registry_mut().record(Outcome::Positive, "P1");
        a.reveal_positive_list();

        assert!(b.registry().is_empty());
        assert!(!b.visibility().show_positive_list());
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 36);
    }
}
