//! Device fingerprint generation
//!
//! Reduces a signal bundle to a stable identifier: a fixed, versioned
//! ordering of canonicalized field strings is joined and hashed with
//! SHA-256. Only relatively stable hardware/software characteristics
//! participate; volatile fields (IP, timestamps, behavior) never do, so
//! one physical device reproduces one fingerprint across visits even
//! when its IP or claimed name changes.
//!
//! # Canonicalization (version 1)
//!
//! Every contributing field occupies a fixed slot. A present field
//! contributes its trimmed string form; a missing field contributes the
//! empty string. A probe block whose error marker is set contributes
//! empty slots for all of its fields. The slot count is therefore
//! constant, and the ordering below is part of the on-disk contract:
//! changing it (or the separator) silently fractures every previously
//! seen device into a new identity, so any change must bump
//! [`FINGERPRINT_VERSION`].

use sha2::{Digest, Sha256};

use vt_protocol::{AdvancedSignals, BasicSignals};

/// Version of the canonical field ordering below
pub const FINGERPRINT_VERSION: u32 = 1;

/// Separator between canonical field slots
const FIELD_SEPARATOR: &str = "|";

/// Generate the device fingerprint for a signal bundle.
///
/// Pure and total: identical input always yields the identical 64-char
/// lowercase hex digest, and an entirely empty bundle still produces a
/// valid fingerprint.
pub fn generate(basic: &BasicSignals, advanced: &AdvancedSignals) -> String {
    let mut slots: Vec<String> = Vec::with_capacity(25);

    // Basic: browser, OS, hardware hints, viewport, language
    slots.push(canon(&basic.browser_family));
    slots.push(canon(&basic.browser_version));
    slots.push(canon(&basic.os_family));
    slots.push(canon(&basic.os_version));
    slots.push(canon(&basic.device_memory));
    slots.push(canon(&basic.arch));
    slots.push(canon(&basic.bitness));
    slots.push(canon(&basic.device_pixel_ratio));
    slots.push(canon(&basic.viewport_width));
    slots.push(canon(&basic.viewport_height));
    slots.push(canon(&basic.accept_language));

    // Advanced: canvas
    slots.push(canon(&advanced.canvas));

    // Advanced: WebGL (4 slots, empty when the probe errored)
    match advanced.webgl.as_ref().filter(|w| !w.is_errored()) {
        Some(webgl) => {
            slots.push(canon(&webgl.vendor));
            slots.push(canon(&webgl.renderer));
            slots.push(canon(&webgl.unmasked_vendor));
            slots.push(canon(&webgl.unmasked_renderer));
        }
        None => slots.extend(std::iter::repeat(String::new()).take(4)),
    }

    // Advanced: audio hash
    match advanced.audio.as_ref().filter(|a| !a.is_errored()) {
        Some(audio) => slots.push(canon(&audio.hash)),
        None => slots.push(String::new()),
    }

    // Advanced: screen geometry (4 slots)
    match advanced.screen.as_ref() {
        Some(screen) => {
            slots.push(canon_num(&screen.width));
            slots.push(canon_num(&screen.height));
            slots.push(canon_num(&screen.color_depth));
            slots.push(canon_num(&screen.pixel_ratio));
        }
        None => slots.extend(std::iter::repeat(String::new()).take(4)),
    }

    // Advanced: installed fonts, sorted so probe order cannot matter
    match advanced.fonts.as_ref().filter(|f| !f.is_errored()) {
        Some(fonts) => {
            let mut installed: Vec<&str> = fonts.installed.iter().map(String::as_str).collect();
            installed.sort_unstable();
            slots.push(installed.join(","));
        }
        None => slots.push(String::new()),
    }

    // Advanced: timezone (2 slots)
    match advanced.timezone.as_ref() {
        Some(tz) => {
            slots.push(canon(&tz.name));
            slots.push(canon_num(&tz.offset_minutes));
        }
        None => slots.extend(std::iter::repeat(String::new()).take(2)),
    }

    // Advanced: JS heap size limit
    match advanced.memory.as_ref() {
        Some(memory) => slots.push(canon_num(&memory.js_heap_size_limit)),
        None => slots.push(String::new()),
    }

    let canonical = slots.join(FIELD_SEPARATOR);
    hex_digest(canonical.as_bytes())
}

fn canon(field: &Option<String>) -> String {
    field.as_deref().map(str::trim).unwrap_or("").to_string()
}

fn canon_num<T: ToString>(field: &Option<T>) -> String {
    field.as_ref().map(T::to_string).unwrap_or_default()
}

fn hex_digest(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
