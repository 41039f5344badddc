//! Configuration loading for smart75.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.smart75/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FailOpen, Result, Smart75Error};

/// Main configuration struct for smart75.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Local record storage configuration.
    pub storage: StorageConfig,
    /// Remote mirror configuration.
    pub remote: RemoteConfig,
}

/// Local record storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Base name of the record file under the smart75 home directory.
    /// The record lives at `<home>/<record_key>.json`.
    pub record_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            record_key: "challenge".to_string(),
        }
    }
}

/// Remote mirror configuration.
///
/// The remote is a best-effort mirror keyed by an opaque user id; local
/// storage stays authoritative on write. All three fields must be present
/// (enabled + dir + user_id) for the mirror to activate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    /// Whether remote mirroring is enabled.
    pub enabled: bool,
    /// Directory holding per-user remote records (e.g. a synced folder).
    pub dir: Option<PathBuf>,
    /// Opaque user identifier for the remote record.
    pub user_id: Option<String>,
}

impl RemoteConfig {
    /// Whether the configuration is complete enough to mirror.
    pub fn is_active(&self) -> bool {
        self.enabled && self.dir.is_some() && self.user_id.is_some()
    }
}

impl Config {
    /// Load configuration with the full precedence chain.
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        config.apply_env_overrides();
        config
    }

    /// Load user config from `<home>/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = smart75_home()?;
        let config_path = home.join("config.toml");
        Self::load_from_file(&config_path).ok()
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Smart75Error::storage(path, e))?;
        toml::from_str(&content).map_err(|e| Smart75Error::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("SMART75_RECORD_KEY") {
            if val.trim().is_empty() {
                eprintln!(
                    "Warning: SMART75_RECORD_KEY is empty. Using '{}'.",
                    self.storage.record_key
                );
            } else {
                self.storage.record_key = val;
            }
        }

        if let Ok(val) = env::var("SMART75_REMOTE_ENABLED") {
            self.remote.enabled = val == "true" || val == "1";
        }

        if let Ok(val) = env::var("SMART75_REMOTE_DIR") {
            if !val.is_empty() {
                self.remote.dir = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = env::var("SMART75_USER_ID") {
            if !val.is_empty() {
                self.remote.user_id = Some(val);
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence; non-default fields from `other`
    /// are applied onto `self`.
    fn merge(mut self, other: Config) -> Self {
        if other.storage.record_key != StorageConfig::default().record_key {
            self.storage.record_key = other.storage.record_key;
        }

        if other.remote.enabled {
            self.remote.enabled = true;
        }
        if other.remote.dir.is_some() {
            self.remote.dir = other.remote.dir;
        }
        if other.remote.user_id.is_some() {
            self.remote.user_id = other.remote.user_id;
        }

        self
    }

    /// Load config with fail-open behavior.
    pub fn load_fail_open() -> Self {
        let result: Result<Self> = Ok(Self::load());
        result.fail_open_default("loading config")
    }

    /// Path of the local challenge record for this configuration.
    pub fn record_path(&self) -> Option<PathBuf> {
        smart75_home().map(|h| h.join(format!("{}.json", self.storage.record_key)))
    }
}

/// Get the smart75 home directory.
///
/// Checks the `SMART75_HOME` environment variable first, then falls back
/// to `~/.smart75`. Invalid values are ignored with a warning.
pub fn smart75_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("SMART75_HOME") {
        if home.is_empty() {
            tracing::warn!("SMART75_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("SMART75_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".smart75"));
    }

    // Containerized/minimal environments without HOME.
    let fallback = std::env::temp_dir().join("smart75");
    tracing::warn!("HOME not set, using fallback location: {}", fallback.display());
    Some(fallback)
}
