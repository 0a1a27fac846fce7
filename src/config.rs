// Settings loaded from the user's config directory
// Missing file means defaults; a malformed file is an error.

use crate::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_DIR_NAME: &str = "volkey";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Platform default long-press timeout
pub const DEFAULT_LONG_PRESS_TIMEOUT_MS: u64 = 400;

/// Upper bound for the long-press timeout; timers must stay short
pub const MAX_LONG_PRESS_TIMEOUT_MS: u64 = 5_000;

/// Host UI configuration consulted once when the interceptor is built
pub trait UiConfiguration {
    /// How long a button must be held before its long-press action fires
    fn long_press_timeout(&self) -> Duration;
}

/// Errors while loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize settings for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Settings used only by the desktop host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostSettings {
    /// Desktop hosts cannot see playback state; report this instead
    pub assume_media_active: bool,
    /// Reported by the desktop power state; false keeps gestures always on
    pub screen_interactive: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            assume_media_active: true,
            screen_interactive: false,
        }
    }
}

/// Persisted settings, camelCase JSON on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub long_press_timeout_ms: u64,
    /// Log filter override, e.g. "debug" or "volkey_lib=trace"
    pub log_level: Option<String>,
    pub host: HostSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            long_press_timeout_ms: DEFAULT_LONG_PRESS_TIMEOUT_MS,
            log_level: None,
            host: HostSettings::default(),
        }
    }
}

impl Settings {
    /// Load from the default location.
    ///
    /// On first run the defaults are written there so the user has a file
    /// to edit.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_init(&get_settings_path()?)
    }

    /// Load from `path`; if nothing is there yet, write the defaults.
    /// A failed write is logged and the defaults are still returned.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load_from(path);
        }

        let settings = Self::default();
        match settings.save_to(path) {
            Ok(()) => info!("Wrote default settings to {:?}", path),
            Err(e) => warn!("Could not write default settings: {}", e),
        }
        Ok(settings)
    }

    /// Load from `path`, falling back to defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;

        debug!("Loaded settings from {:?}: {:?}", path, settings);
        Ok(settings)
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json =
            serde_json::to_string_pretty(self).map_err(|source| ConfigError::Serialize {
                path: path.to_path_buf(),
                source,
            })?;
        std::fs::write(path, json).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_LONG_PRESS_TIMEOUT_MS).contains(&self.long_press_timeout_ms) {
            return Err(ConfigError::Invalid {
                key: "longPressTimeoutMs",
                reason: format!(
                    "{} is outside 1..={}",
                    self.long_press_timeout_ms, MAX_LONG_PRESS_TIMEOUT_MS
                ),
            });
        }
        Ok(())
    }
}

impl UiConfiguration for Settings {
    fn long_press_timeout(&self) -> Duration {
        Duration::from_millis(self.long_press_timeout_ms)
    }
}

/// Get the path of the settings file
/// Returns {config_dir}/volkey/settings.json
pub fn get_settings_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(config_dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
