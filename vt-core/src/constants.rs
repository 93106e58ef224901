//! Constants and path resolution for visitrack

/// Store file and path constants
pub mod paths {
    use std::path::PathBuf;

    /// Default store filename under the config directory
    pub const STORE_FILENAME: &str = "device_history.json";

    /// User configuration directory for visitrack.
    /// Resolution order: $XDG_CONFIG_HOME, $HOME/.config, platform default.
    pub fn user_config_dir() -> Option<PathBuf> {
        let config_base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            Some(PathBuf::from(xdg))
        } else if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".config"))
        } else {
            dirs::config_dir()
        };

        config_base.map(|p| p.join("visitrack"))
    }

    /// Default on-disk location of the device store
    pub fn default_store_path() -> Option<PathBuf> {
        user_config_dir().map(|p| p.join(STORE_FILENAME))
    }
}

/// Persistence limits and retry policy
pub mod persistence {
    /// Refuse to load store files larger than this (corruption / DoS guard)
    pub const MAX_STORE_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

    /// Durable-write attempts before giving up on a single mutation
    pub const PERSIST_ATTEMPTS: u32 = 3;

    /// Base backoff between write attempts, multiplied by the attempt number
    pub const PERSIST_BACKOFF_MS: u64 = 50;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_path_uses_config_dir() {
        std::env::set_var("XDG_CONFIG_HOME", "/custom/config");
        let path = paths::default_store_path().unwrap();
        assert!(path
            .to_string_lossy()
            .contains("/custom/config/visitrack/device_history.json"));
        std::env::remove_var("XDG_CONFIG_HOME");
    }
}
