//! Shared data types for visitrack
//!
//! These are the shapes exchanged between the recognition engine and the
//! layers around it: the signal bundle reported by the collection script,
//! the persistent device record, and the engine's outputs. The web-serving
//! and reporting layers depend on this crate without pulling in the engine.

pub mod bundle;
pub mod record;
pub mod result;

pub use bundle::{
    AdvancedSignals, AudioSignal, BasicSignals, FontSignals, MemorySignal, ScreenSignals,
    TimezoneSignal, WebGlSignals,
};
pub use record::{DeviceRecord, VisitEntry, SHORT_FINGERPRINT_LEN, VISIT_HISTORY_CAP};
pub use result::{RecognitionOutcome, RecognitionResult, StatsSummary};
