//! File-based challenge storage for smart75.
//!
//! The record is a single JSON file, `<home>/<record_key>.json` by default.
//! Atomic writes are achieved via temp file + rename. A record that fails
//! to parse is quarantined (renamed aside) and reported as "no data": the
//! user lands on onboarding instead of a crash, and the damaged bytes are
//! kept for manual inspection.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::core::ChallengeState;
use crate::error::{Result, Smart75Error};
use crate::storage::ChallengeStore;
use crate::util::read_to_string_limited;

/// File-based challenge record store.
#[derive(Debug, Clone)]
pub struct FileChallengeStore {
    /// Path of the record file.
    path: PathBuf,
}

impl FileChallengeStore {
    /// Create a store at the configured record path.
    pub fn new(config: &Config) -> Result<Self> {
        let path = config.record_path().ok_or_else(|| {
            Smart75Error::config("could not determine record path (no home directory)")
        })?;
        Self::with_path(path)
    }

    /// Create a store with an explicit record file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| Smart75Error::storage(parent, e))?;
            }
        }

        Ok(Self { path })
    }

    /// Path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn quarantine_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    /// Write the record atomically using temp file + rename.
    fn atomic_write(&self, state: &ChallengeState) -> Result<()> {
        let temp_path = self.temp_path();
        let json = serde_json::to_string_pretty(state)?;

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| Smart75Error::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| Smart75Error::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| Smart75Error::storage(&temp_path, e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| Smart75Error::storage(&self.path, e))?;

        Ok(())
    }

    /// Move a malformed record aside so it is not clobbered by the next
    /// save, and is still there if the user wants to look at it.
    fn quarantine(&self) {
        let quarantine = self.quarantine_path();
        if fs::rename(&self.path, &quarantine).is_ok() {
            tracing::warn!(
                "quarantined malformed record to {}",
                quarantine.display()
            );
        } else {
            tracing::warn!("failed to quarantine malformed record {}", self.path.display());
        }
    }
}

impl ChallengeStore for FileChallengeStore {
    fn load(&self) -> Result<Option<ChallengeState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = read_to_string_limited(&self.path)?;

        match serde_json::from_str::<ChallengeState>(&content) {
            Ok(state) => Ok(Some(state)),
            Err(err) => {
                tracing::warn!(
                    "record at {} is malformed ({}), treating as no data",
                    self.path.display(),
                    err
                );
                self.quarantine();
                Ok(None)
            }
        }
    }

    fn save(&self, state: &ChallengeState) -> Result<()> {
        self.atomic_write(state)
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| Smart75Error::storage(&self.path, e))?;
        }

        let temp_path = self.temp_path();
        if temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }

        Ok(())
    }

    /// Probe the backend by round-tripping a throwaway file next to the
    /// record, the same check a browser app does with a test storage key.
    fn is_available(&self) -> bool {
        let Some(parent) = self.path.parent() else {
            return false;
        };
        let probe = parent.join(".smart75-probe.tmp");

        let ok = fs::write(&probe, b"probe").is_ok();
        if ok {
            let _ = fs::remove_file(&probe);
        }
        ok
    }
}
