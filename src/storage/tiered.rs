//! Two-tier challenge storage: local authoritative, remote best-effort.
//!
//! When a user identity is present the remote record is preferred on read
//! and mirrored on write, but the local store always also receives every
//! write as a fallback cache. A failed remote call degrades to local-only
//! persistence with a warning; it never fails the operation, and the core
//! does not track "synced" vs "local-only" state.

use crate::core::ChallengeState;
use crate::error::{FailOpen, Result, Smart75Error};
use crate::storage::{ChallengeStore, RemoteStore};

/// Local + remote layered store.
#[derive(Debug)]
pub struct TieredStore<L: ChallengeStore, R: RemoteStore> {
    local: L,
    remote: R,
    user_id: String,
}

impl<L: ChallengeStore, R: RemoteStore> TieredStore<L, R> {
    /// Create a tiered store for a given user identity.
    pub fn new(local: L, remote: R, user_id: impl Into<String>) -> Self {
        Self {
            local,
            remote,
            user_id: user_id.into(),
        }
    }

    /// The wrapped local store.
    pub fn local(&self) -> &L {
        &self.local
    }

    /// One-time copy of the local record to the remote.
    ///
    /// Refuses with a conflict error when the remote already holds data for
    /// this user, unless `overwrite` is set: existing remote data is never
    /// replaced silently.
    pub fn migrate(&self, overwrite: bool) -> Result<()> {
        if !self.remote.ping() {
            return Err(Smart75Error::remote(format!(
                "remote store '{}' is unreachable",
                self.remote.name()
            )));
        }

        let Some(state) = self.local.load()? else {
            return Err(Smart75Error::validation(
                "no local challenge record to migrate",
            ));
        };

        if !overwrite && self.remote.load_remote(&self.user_id)?.is_some() {
            return Err(Smart75Error::remote_conflict(format!(
                "remote record already exists for user {}",
                self.user_id
            )));
        }

        self.remote.save_remote(&self.user_id, &state)
    }
}

impl<L: ChallengeStore, R: RemoteStore> ChallengeStore for TieredStore<L, R> {
    fn load(&self) -> Result<Option<ChallengeState>> {
        if self.remote.ping() {
            match self.remote.load_remote(&self.user_id) {
                Ok(Some(state)) => {
                    // Refresh the local fallback cache; best-effort.
                    self.local
                        .save(&state)
                        .fail_open_default("refreshing local cache from remote");
                    return Ok(Some(state));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        "remote '{}' load failed ({}), falling back to local",
                        self.remote.name(),
                        err
                    );
                }
            }
        }

        self.local.load()
    }

    fn save(&self, state: &ChallengeState) -> Result<()> {
        // Local first: it is authoritative, and its failure fails the save.
        self.local.save(state)?;

        self.remote
            .save_remote(&self.user_id, state)
            .fail_open_default("mirroring record to remote");

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        // The remote contract has no clear; only the local record is
        // destroyed here.
        self.local.clear()
    }

    fn is_available(&self) -> bool {
        self.local.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{default_rules, initialize};
    use crate::storage::{MemoryChallengeStore, MemoryRemoteStore};
    use std::sync::Arc;

    fn setup() -> (
        Arc<MemoryChallengeStore>,
        Arc<MemoryRemoteStore>,
        TieredStore<Arc<MemoryChallengeStore>, Arc<MemoryRemoteStore>>,
    ) {
        let local = Arc::new(MemoryChallengeStore::new());
        let remote = Arc::new(MemoryRemoteStore::new());
        let tiered = TieredStore::new(local.clone(), remote.clone(), "u-1");
        (local, remote, tiered)
    }

    #[test]
    fn test_save_writes_both_tiers() {
        let (local, remote, tiered) = setup();
        let state = initialize(default_rules(), "2026-06-01").unwrap();

        tiered.save(&state).unwrap();

        assert_eq!(local.load().unwrap().unwrap(), state);
        assert_eq!(remote.load_remote("u-1").unwrap().unwrap(), state);
    }

    #[test]
    fn test_save_survives_remote_failure() {
        let (local, remote, tiered) = setup();
        remote.set_failing(true);

        let state = initialize(default_rules(), "2026-06-01").unwrap();
        tiered.save(&state).unwrap();

        assert_eq!(local.load().unwrap().unwrap(), state);
        remote.set_failing(false);
        assert!(remote.load_remote("u-1").unwrap().is_none());
    }

    #[test]
    fn test_load_prefers_remote() {
        let (local, remote, tiered) = setup();

        let local_state = initialize(default_rules(), "2026-06-01").unwrap();
        local.save(&local_state).unwrap();

        let mut remote_state = local_state.clone();
        remote_state.challenge.current_streak = 9;
        remote.save_remote("u-1", &remote_state).unwrap();

        let loaded = tiered.load().unwrap().unwrap();
        assert_eq!(loaded.challenge.current_streak, 9);
        // Remote read refreshed the local cache.
        assert_eq!(local.load().unwrap().unwrap().challenge.current_streak, 9);
    }

    #[test]
    fn test_load_falls_back_to_local_when_remote_empty() {
        let (local, _remote, tiered) = setup();

        let state = initialize(default_rules(), "2026-06-01").unwrap();
        local.save(&state).unwrap();

        assert_eq!(tiered.load().unwrap().unwrap(), state);
    }

    #[test]
    fn test_load_falls_back_to_local_when_remote_failing() {
        let (local, remote, tiered) = setup();
        remote.set_failing(true);

        let state = initialize(default_rules(), "2026-06-01").unwrap();
        local.save(&state).unwrap();

        assert_eq!(tiered.load().unwrap().unwrap(), state);
    }

    #[test]
    fn test_clear_leaves_remote_untouched() {
        let (local, remote, tiered) = setup();
        let state = initialize(default_rules(), "2026-06-01").unwrap();
        tiered.save(&state).unwrap();

        tiered.clear().unwrap();

        assert!(local.load().unwrap().is_none());
        assert!(remote.load_remote("u-1").unwrap().is_some());
    }

    #[test]
    fn test_migrate_copies_when_remote_empty() {
        let (local, remote, tiered) = setup();
        let state = initialize(default_rules(), "2026-06-01").unwrap();
        local.save(&state).unwrap();

        tiered.migrate(false).unwrap();
        assert_eq!(remote.load_remote("u-1").unwrap().unwrap(), state);
    }

    #[test]
    fn test_migrate_refuses_existing_remote() {
        let (local, remote, tiered) = setup();
        let state = initialize(default_rules(), "2026-06-01").unwrap();
        local.save(&state).unwrap();

        let mut existing = state.clone();
        existing.challenge.total_resets = 4;
        remote.save_remote("u-1", &existing).unwrap();

        let err = tiered.migrate(false).unwrap_err();
        assert!(matches!(err, Smart75Error::RemoteConflict { .. }));
        // Remote unchanged.
        assert_eq!(
            remote.load_remote("u-1").unwrap().unwrap().challenge.total_resets,
            4
        );
    }

    #[test]
    fn test_migrate_overwrite_replaces() {
        let (local, remote, tiered) = setup();
        let state = initialize(default_rules(), "2026-06-01").unwrap();
        local.save(&state).unwrap();

        let mut existing = state.clone();
        existing.challenge.total_resets = 4;
        remote.save_remote("u-1", &existing).unwrap();

        tiered.migrate(true).unwrap();
        assert_eq!(
            remote.load_remote("u-1").unwrap().unwrap().challenge.total_resets,
            0
        );
    }

    #[test]
    fn test_migrate_without_local_data() {
        let (_local, _remote, tiered) = setup();
        let err = tiered.migrate(false).unwrap_err();
        assert!(matches!(err, Smart75Error::Validation { .. }));
    }

    #[test]
    fn test_migrate_unreachable_remote() {
        let (local, remote, tiered) = setup();
        let state = initialize(default_rules(), "2026-06-01").unwrap();
        local.save(&state).unwrap();
        remote.set_failing(true);

        let err = tiered.migrate(false).unwrap_err();
        assert!(matches!(err, Smart75Error::RemoteUnavailable { .. }));
    }
}
