//! Client-reported signal bundle
//!
//! The collection script reports a loose bag of attributes per visit. Nothing
//! in it is trusted and no field is guaranteed present, so every field is
//! optional and deserialization tolerates missing keys. Values that arrive as
//! client-hint headers stay raw strings; structured probes (WebGL, screen,
//! fonts, ...) get their own sub-structs with an error marker the probe sets
//! when it failed in the browser.

use serde::{Deserialize, Serialize};

/// Basic attributes, mostly derived from headers and client hints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicSignals {
    pub browser_family: Option<String>,
    pub browser_version: Option<String>,
    pub os_family: Option<String>,
    pub os_version: Option<String>,
    /// Sec-CH-Device-Memory, raw header value
    pub device_memory: Option<String>,
    /// Sec-CH-UA-Arch
    pub arch: Option<String>,
    /// Sec-CH-UA-Bitness
    pub bitness: Option<String>,
    /// Sec-CH-DPR
    pub device_pixel_ratio: Option<String>,
    pub viewport_width: Option<String>,
    pub viewport_height: Option<String>,
    pub accept_language: Option<String>,
}

/// High-entropy attributes from in-browser probes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedSignals {
    /// Canvas rendering signature
    pub canvas: Option<String>,
    pub webgl: Option<WebGlSignals>,
    pub audio: Option<AudioSignal>,
    pub screen: Option<ScreenSignals>,
    pub fonts: Option<FontSignals>,
    pub timezone: Option<TimezoneSignal>,
    pub memory: Option<MemorySignal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebGlSignals {
    pub vendor: Option<String>,
    pub renderer: Option<String>,
    /// Unmasked strings expose the real GPU, when the browser allows it
    pub unmasked_vendor: Option<String>,
    pub unmasked_renderer: Option<String>,
    /// Set by the probe when WebGL was unavailable or threw
    pub error: Option<String>,
}

impl WebGlSignals {
    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSignal {
    /// Hash of the offline audio-processing output
    pub hash: Option<String>,
    pub error: Option<String>,
}

impl AudioSignal {
    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSignals {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub color_depth: Option<u32>,
    pub pixel_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSignals {
    /// Fonts the probe found installed
    pub installed: Vec<String>,
    pub error: Option<String>,
}

impl FontSignals {
    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimezoneSignal {
    /// IANA timezone name, e.g. "Europe/Berlin"
    pub name: Option<String>,
    /// UTC offset in minutes
    pub offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySignal {
    pub js_heap_size_limit: Option<u64>,
}
