//! Engine outputs consumed by the reporting layer

use serde::{Deserialize, Serialize};

use crate::record::DeviceRecord;

/// Classification of one visit against a device's prior history.
///
/// Computed against the record's state before the visit was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "data")]
pub enum RecognitionOutcome {
    /// No record existed for this fingerprint
    New,
    /// Record existed and the claimed name was already known
    Returning,
    /// Record existed but this name was never claimed on it before.
    /// A heuristic evasion signal, not proof.
    IdentityChanged {
        /// Names the device was previously seen under
        prior_names: Vec<String>,
    },
}

impl RecognitionOutcome {
    pub fn is_returning(&self) -> bool {
        !matches!(self, Self::New)
    }

    pub fn is_identity_changed(&self) -> bool {
        matches!(self, Self::IdentityChanged { .. })
    }
}

/// Full result of one recognition call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub outcome: RecognitionOutcome,
    /// The record after this visit was applied
    pub record: DeviceRecord,
}

/// Summary counts over the whole device store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_unique_devices: u64,
    pub total_visits: u64,
    /// Devices with more than one visit
    pub returning_devices: u64,
    /// Devices seen under more than one claimed name
    pub devices_with_multiple_names: u64,
    /// Devices seen exactly once so far
    pub new_devices: u64,
}
