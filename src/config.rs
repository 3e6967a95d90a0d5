//! Engine configuration persistence
//!
//! Stores timing settings in `~/.config/bindkit/config.yaml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reading or writing config and bind files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Layout version written by this build. Files carrying another version are
/// backed up and rewritten on load.
pub const CONFIG_VERSION: u32 = 1;

/// Highest tick rate `validate` lets through
pub const MAX_TICK_RATE: u32 = 1000;

/// Longest hold threshold `validate` lets through, in milliseconds
pub const MAX_HOLD_THRESHOLD_MS: u64 = 60_000;

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Layout version; a file without one reads as 0
    #[serde(default)]
    pub version: u32,
    /// Host simulation ticks per second
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// Press duration after which `is_pressed_and_held` turns on again
    #[serde(default = "default_hold_threshold_ms")]
    pub hold_threshold_ms: u64,
}

fn default_tick_rate() -> u32 {
    60
}

fn default_hold_threshold_ms() -> u64 {
    500
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            tick_rate: default_tick_rate(),
            hold_threshold_ms: default_hold_threshold_ms(),
        }
    }
}

impl EngineConfig {
    /// Hold threshold converted to ticks, rounded up, at least one tick
    pub fn hold_threshold_ticks(&self) -> u64 {
        let rate = u64::from(self.tick_rate.max(1));
        (self.hold_threshold_ms * rate).div_ceil(1000).max(1)
    }

    /// Clamp settings into their supported ranges and stamp the current
    /// version
    pub fn validate(&mut self) {
        self.tick_rate = self.tick_rate.clamp(1, MAX_TICK_RATE);
        self.hold_threshold_ms = self.hold_threshold_ms.min(MAX_HOLD_THRESHOLD_MS);
        self.version = CONFIG_VERSION;
    }

    /// Load config from the user config dir, repairing it if needed.
    /// Falls back to defaults when there is no config dir.
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_or_repair(&path)
    }

    /// Load config from `path`, never failing.
    ///
    /// - Missing file: defaults, nothing is written
    /// - Unreadable or unparsable file: backed up to `old_<name>`, then
    ///   replaced with defaults
    /// - Version mismatch: backed up, validated, and written back
    pub fn load_or_repair(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        let mut config = match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                return Self::reset(path);
            }
        };
        tracing::info!("Loaded config from {}", path.display());

        if config.version != CONFIG_VERSION {
            tracing::warn!(
                "Config at {} has version {}, expected {}",
                path.display(),
                config.version,
                CONFIG_VERSION
            );
            Self::backup_logged(path);
            config.validate();
            if let Err(e) = config.save_to(path) {
                tracing::warn!("Failed to rewrite config: {}", e);
            }
        }
        config
    }

    /// Back up the file at `path` and overwrite it with defaults
    pub fn reset(path: &Path) -> Self {
        Self::backup_logged(path);
        let config = Self::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Failed to write default config: {}", e);
        }
        config
    }

    /// Copy the file at `path` to `old_<name>` in the same directory
    pub fn backup(path: &Path) -> Result<PathBuf, ConfigError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let backup = path.with_file_name(format!("old_{name}"));
        std::fs::copy(path, &backup).map_err(|e| ConfigError::io(&backup, e))?;
        tracing::info!("Backed up config to {}", backup.display());
        Ok(backup)
    }

    fn backup_logged(path: &Path) {
        if let Err(e) = Self::backup(path) {
            tracing::warn!("Failed to back up config: {}", e);
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
