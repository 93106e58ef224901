//! Visitrack Core Library
//!
//! Correlates loosely-reliable client-reported signals into a stable
//! per-device identity and classifies each visit against that device's
//! accumulated history.
//!
//! # Module Structure
//!
//! - `fingerprint` - Deterministic reduction of a signal bundle to a device fingerprint
//! - `store` - Durable device record store (single source of truth)
//! - `recognize` - Visit classification against stored history
//! - `stats` - Read-only summary counts over the store
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vt_core::{fingerprint, DeviceStore, Recognizer};
//! use vt_protocol::{AdvancedSignals, BasicSignals};
//!
//! let store = Arc::new(DeviceStore::open_default().unwrap());
//! let recognizer = Recognizer::new(store);
//!
//! let id = fingerprint::generate(&BasicSignals::default(), &AdvancedSignals::default());
//! let result = recognizer.recognize(&id, "alice#1337", "203.0.113.7", 1_700_000_000_000);
//! ```

pub mod constants;
pub mod fingerprint;
pub mod recognize;
pub mod stats;
pub mod store;

// Re-export primary types
pub use recognize::Recognizer;
pub use stats::summarize;
pub use store::DeviceStore;

// Re-export the shared error and protocol types for convenience
pub use vt_error::{Result, VisitrackError};
pub use vt_protocol::{
    AdvancedSignals, BasicSignals, DeviceRecord, RecognitionOutcome, RecognitionResult,
    StatsSummary, VisitEntry,
};
