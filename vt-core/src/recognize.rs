//! Visit recognition
//!
//! Classifies one visit against the history stored for its fingerprint and
//! applies the visit in the same atomic store operation, so classification
//! and bookkeeping can never disagree under concurrency.

use std::sync::Arc;

use tracing::{debug, info, warn};

use vt_protocol::{RecognitionOutcome, RecognitionResult};

use crate::store::DeviceStore;

/// Classifies visits against a shared [`DeviceStore`]
pub struct Recognizer {
    store: Arc<DeviceStore>,
}

impl Recognizer {
    pub fn new(store: Arc<DeviceStore>) -> Self {
        Self { store }
    }

    /// Recognize one visit.
    ///
    /// The outcome is computed against the record's state before this
    /// visit is applied: no record means [`RecognitionOutcome::New`], a
    /// known claimed name means [`RecognitionOutcome::Returning`], and an
    /// unknown name on an existing record means
    /// [`RecognitionOutcome::IdentityChanged`] carrying the names the
    /// device was previously seen under.
    ///
    /// An empty claimed name is a legitimate sentinel identity and is
    /// tracked and compared like any other.
    pub fn recognize(
        &self,
        fingerprint: &str,
        claimed_name: &str,
        ip: &str,
        timestamp_ms: u64,
    ) -> RecognitionResult {
        let (record, outcome) = self.store.upsert(fingerprint, |record, created| {
            let outcome = if created {
                RecognitionOutcome::New
            } else if record.knows_name(claimed_name) {
                RecognitionOutcome::Returning
            } else {
                RecognitionOutcome::IdentityChanged {
                    prior_names: record.names.clone(),
                }
            };
            record.record_visit(claimed_name, ip, timestamp_ms);
            outcome
        });

        match &outcome {
            RecognitionOutcome::New => {
                info!(
                    fingerprint = %record.short_fingerprint(),
                    name = claimed_name,
                    "New device"
                );
            }
            RecognitionOutcome::Returning => {
                debug!(
                    fingerprint = %record.short_fingerprint(),
                    name = claimed_name,
                    visits = record.visit_count,
                    "Returning device"
                );
            }
            RecognitionOutcome::IdentityChanged { prior_names } => {
                warn!(
                    fingerprint = %record.short_fingerprint(),
                    name = claimed_name,
                    prior_names = ?prior_names,
                    "Returning device under a new identity"
                );
            }
        }

        RecognitionResult { outcome, record }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn recognizer(dir: &tempfile::TempDir) -> Recognizer {
        let store = Arc::new(DeviceStore::open(dir.path().join("device_history.json")));
        Recognizer::new(store)
    }

    #[test]
    fn test_first_visit_is_new() {
        let dir = tempdir().unwrap();
        let recognizer = recognizer(&dir);

        let result = recognizer.recognize("fp1", "alice", "10.0.0.1", 1_000);
        assert_eq!(result.outcome, RecognitionOutcome::New);
        assert_eq!(result.record.visit_count, 1);
        assert_eq!(result.record.names, vec!["alice"]);
        assert_eq!(result.record.first_seen, result.record.last_seen);
    }

    #[test]
    fn test_same_name_is_returning() {
        let dir = tempdir().unwrap();
        let recognizer = recognizer(&dir);
        recognizer.recognize("fp1", "alice", "10.0.0.1", 1_000);

        let result = recognizer.recognize("fp1", "alice", "10.0.0.2", 2_000);
        assert_eq!(result.outcome, RecognitionOutcome::Returning);
        assert_eq!(result.record.visit_count, 2);
        assert_eq!(result.record.ip_history, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_new_name_is_identity_changed() {
        let dir = tempdir().unwrap();
        let recognizer = recognizer(&dir);
        recognizer.recognize("fp1", "alice", "10.0.0.1", 1_000);

        let result = recognizer.recognize("fp1", "bob", "10.0.0.1", 2_000);
        assert_eq!(
            result.outcome,
            RecognitionOutcome::IdentityChanged {
                prior_names: vec!["alice".to_string()]
            }
        );
        // Prior names exclude the new one; the record includes it
        assert_eq!(result.record.names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_empty_name_is_a_sentinel_identity() {
        let dir = tempdir().unwrap();
        let recognizer = recognizer(&dir);

        let result = recognizer.recognize("fp1", "", "10.0.0.1", 1_000);
        assert_eq!(result.outcome, RecognitionOutcome::New);

        let result = recognizer.recognize("fp1", "", "10.0.0.1", 2_000);
        assert_eq!(result.outcome, RecognitionOutcome::Returning);

        let result = recognizer.recognize("fp1", "alice", "10.0.0.1", 3_000);
        assert!(result.outcome.is_identity_changed());
    }

    #[test]
    fn test_distinct_fingerprints_stay_distinct() {
        let dir = tempdir().unwrap();
        let recognizer = recognizer(&dir);
        recognizer.recognize("fp1", "alice", "10.0.0.1", 1_000);

        let result = recognizer.recognize("fp2", "alice", "10.0.0.1", 2_000);
        assert_eq!(result.outcome, RecognitionOutcome::New);
    }
}
