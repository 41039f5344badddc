//! Directory-backed remote store.
//!
//! Implements the remote collaborator contract over per-user JSON files in
//! a configurable directory, typically a synced or network-mounted folder.
//! A hosted HTTP backend would implement the same `RemoteStore` trait
//! outside this crate; the core never knows the difference.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::ChallengeState;
use crate::error::{Result, Smart75Error};
use crate::storage::RemoteStore;
use crate::util::read_to_string_limited;

/// Remote store backed by a directory of per-user records.
#[derive(Debug, Clone)]
pub struct DirRemoteStore {
    dir: PathBuf,
}

impl DirRemoteStore {
    /// Create a remote store over the given directory, creating it if
    /// missing.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| Smart75Error::storage(&dir, e))?;
        }
        Ok(Self { dir })
    }

    /// The directory holding remote records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, user_id: &str) -> PathBuf {
        // User ids are opaque; keep the file name safe regardless.
        let safe: String = user_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl RemoteStore for DirRemoteStore {
    fn load_remote(&self, user_id: &str) -> Result<Option<ChallengeState>> {
        let path = self.record_path(user_id);
        if !path.exists() {
            return Ok(None);
        }

        let content = read_to_string_limited(&path)?;
        let state = serde_json::from_str(&content)
            .map_err(|e| Smart75Error::remote(format!("malformed remote record: {e}")))?;
        Ok(Some(state))
    }

    fn save_remote(&self, user_id: &str, state: &ChallengeState) -> Result<()> {
        let path = self.record_path(user_id);
        let temp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(state)?;

        {
            let mut file =
                fs::File::create(&temp).map_err(|e| Smart75Error::storage(&temp, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| Smart75Error::storage(&temp, e))?;
            file.sync_all().map_err(|e| Smart75Error::storage(&temp, e))?;
        }
        fs::rename(&temp, &path).map_err(|e| Smart75Error::storage(&path, e))?;

        Ok(())
    }

    fn ping(&self) -> bool {
        self.dir.is_dir()
    }

    fn name(&self) -> &'static str {
        "dir"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{default_rules, initialize};
    use tempfile::TempDir;

    fn setup() -> (DirRemoteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = DirRemoteStore::new(dir.path().join("mirror")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_new_creates_directory() {
        let (store, _dir) = setup();
        assert!(store.dir().is_dir());
        assert!(store.ping());
    }

    #[test]
    fn test_load_missing_user() {
        let (store, _dir) = setup();
        assert!(store.load_remote("u-1").unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_per_user() {
        let (store, _dir) = setup();
        let state = initialize(default_rules(), "2026-06-01").unwrap();

        store.save_remote("u-1", &state).unwrap();
        assert_eq!(store.load_remote("u-1").unwrap().unwrap(), state);
        assert!(store.load_remote("u-2").unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces() {
        let (store, _dir) = setup();
        let state = initialize(default_rules(), "2026-06-01").unwrap();
        store.save_remote("u-1", &state).unwrap();

        let mut newer = state.clone();
        newer.challenge.total_resets = 5;
        store.save_remote("u-1", &newer).unwrap();

        assert_eq!(
            store.load_remote("u-1").unwrap().unwrap().challenge.total_resets,
            5
        );
    }

    #[test]
    fn test_unsafe_user_id_characters_sanitized() {
        let (store, _dir) = setup();
        let state = initialize(default_rules(), "2026-06-01").unwrap();

        store.save_remote("../evil/../../id", &state).unwrap();
        // The record landed inside the mirror directory.
        let entries: Vec<_> = fs::read_dir(store.dir()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(store.load_remote("../evil/../../id").unwrap().is_some());
    }

    #[test]
    fn test_malformed_remote_record_errors() {
        let (store, _dir) = setup();
        fs::write(store.record_path("u-1"), "{nope").unwrap();

        assert!(store.load_remote("u-1").is_err());
    }

    #[test]
    fn test_ping_false_when_dir_removed() {
        let (store, _dir) = setup();
        fs::remove_dir_all(store.dir()).unwrap();
        assert!(!store.ping());
    }
}
