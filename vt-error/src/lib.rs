//! Unified error handling for visitrack
//!
//! This crate provides a single error type used across all visitrack components.
//! It uses thiserror for ergonomic error definitions with proper Display and Error trait impls.

use std::io;
use std::path::PathBuf;

/// Result type alias using VisitrackError
pub type Result<T> = std::result::Result<T, VisitrackError>;

/// Unified error type for all visitrack operations
#[derive(thiserror::Error, Debug)]
pub enum VisitrackError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // ============================================================================
    // Store Errors
    // ============================================================================
    #[error("Device store error: {0}")]
    Store(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Unsupported store version: {found} (current {current})")]
    UnsupportedStoreVersion {
        found: u32,
        current: u32,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Generic(String),
}

impl VisitrackError {
    /// Create a generic error from a string
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create a store error from a string
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

// Allow converting from String to VisitrackError
impl From<String> for VisitrackError {
    fn from(s: String) -> Self {
        Self::Generic(s)
    }
}

// Allow converting from &str to VisitrackError
impl From<&str> for VisitrackError {
    fn from(s: &str) -> Self {
        Self::Generic(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = VisitrackError::store("write failed");
        assert_eq!(err.to_string(), "Device store error: write failed");

        let err = VisitrackError::config("no config directory");
        assert_eq!(err.to_string(), "Configuration error: no config directory");
    }

    #[test]
    fn test_from_string() {
        let err: VisitrackError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: VisitrackError = io_err.into();
        assert!(matches!(err, VisitrackError::Io(_)));
    }
}
