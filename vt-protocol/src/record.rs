//! Persistent device record
//!
//! One record accumulates per device fingerprint: every claimed name and IP
//! ever seen (insertion order, no duplicates), visit counters and a bounded
//! tail of recent visits. Records are owned by the device store; callers only
//! ever get clones.

use serde::{Deserialize, Serialize};

/// Maximum number of visits kept per record, oldest evicted first
pub const VISIT_HISTORY_CAP: usize = 20;

/// Prefix length used when displaying a fingerprint
pub const SHORT_FINGERPRINT_LEN: usize = 16;

/// One entry in a record's visit history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitEntry {
    /// Visit timestamp, epoch milliseconds
    pub timestamp: u64,
    /// Claimed identity at the time of the visit
    pub name: String,
    pub ip: String,
}

/// Accumulated history for one device fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// The fingerprint this record is keyed by, immutable once created
    pub fingerprint: String,
    /// Distinct claimed names, in order of first appearance
    pub names: Vec<String>,
    /// Distinct source IPs, in order of first appearance
    pub ip_history: Vec<String>,
    /// Incremented exactly once per recognition
    pub visit_count: u64,
    /// Epoch milliseconds, set once at creation
    pub first_seen: u64,
    /// Epoch milliseconds, never moves backward
    pub last_seen: u64,
    /// Most recent visits, capped at [`VISIT_HISTORY_CAP`]
    pub visit_history: Vec<VisitEntry>,
}

impl DeviceRecord {
    /// Create a blank record for a fingerprint first seen at `now`
    pub fn new(fingerprint: impl Into<String>, now: u64) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            names: Vec::new(),
            ip_history: Vec::new(),
            visit_count: 0,
            first_seen: now,
            last_seen: now,
            visit_history: Vec::new(),
        }
    }

    /// Whether `name` has been claimed on this device before
    pub fn knows_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Apply one visit to the record.
    ///
    /// Dedup-appends the name and IP, bumps the visit counter, advances
    /// `last_seen` (never backward) and appends to the bounded history.
    pub fn record_visit(&mut self, name: &str, ip: &str, timestamp: u64) {
        if !self.knows_name(name) {
            self.names.push(name.to_string());
        }
        if !self.ip_history.iter().any(|i| i == ip) {
            self.ip_history.push(ip.to_string());
        }
        self.visit_count += 1;
        self.last_seen = self.last_seen.max(timestamp);
        self.visit_history.push(VisitEntry {
            timestamp,
            name: name.to_string(),
            ip: ip.to_string(),
        });
        if self.visit_history.len() > VISIT_HISTORY_CAP {
            let excess = self.visit_history.len() - VISIT_HISTORY_CAP;
            self.visit_history.drain(..excess);
        }
    }

    /// Truncated fingerprint for display, e.g. in report embeds
    pub fn short_fingerprint(&self) -> String {
        if self.fingerprint.len() <= SHORT_FINGERPRINT_LEN {
            return self.fingerprint.clone();
        }
        format!("{}...", &self.fingerprint[..SHORT_FINGERPRINT_LEN])
    }

    /// The last `n` visits, oldest first
    pub fn recent_visits(&self, n: usize) -> &[VisitEntry] {
        let start = self.visit_history.len().saturating_sub(n);
        &self.visit_history[start..]
    }
}
