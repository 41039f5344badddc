//! Storage traits for smart75.
//!
//! `ChallengeStore` is the persistence seam for the single challenge
//! record; `RemoteStore` is the narrow contract of the optional remote
//! collaborator. Stores are injected handles, never ambient globals, so
//! multiple profiles and test isolation need no shared state.

use std::sync::Arc;

use crate::core::ChallengeState;
use crate::error::Result;

/// Trait for challenge record storage backends.
///
/// One record per store; every save replaces the whole aggregate.
pub trait ChallengeStore: Send + Sync {
    /// Load the challenge record.
    ///
    /// Returns `Ok(None)` when no challenge exists yet, including when the
    /// persisted record is malformed (corrupt records are treated as "no
    /// data", never as a crash).
    fn load(&self) -> Result<Option<ChallengeState>>;

    /// Persist the challenge record, replacing any previous value.
    fn save(&self, state: &ChallengeState) -> Result<()>;

    /// Destroy the record, returning to the no-challenge state.
    ///
    /// Succeeds when no record exists.
    fn clear(&self) -> Result<()>;

    /// Capability probe, performed once at startup.
    ///
    /// When this reports false the application must refuse to operate;
    /// no transitions are attempted against an unavailable backend.
    fn is_available(&self) -> bool;

    /// Check whether a challenge record exists.
    fn exists(&self) -> Result<bool> {
        Ok(self.load()?.is_some())
    }
}

/// Blanket implementation of ChallengeStore for Arc-wrapped stores.
///
/// This allows using `Arc<T>` where `T: ChallengeStore` is expected,
/// which is useful for sharing stores between tests and commands.
impl<T: ChallengeStore + ?Sized> ChallengeStore for Arc<T> {
    fn load(&self) -> Result<Option<ChallengeState>> {
        (**self).load()
    }

    fn save(&self, state: &ChallengeState) -> Result<()> {
        (**self).save(state)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Trait for the remote record collaborator.
///
/// Records are keyed by an opaque user identifier with upsert semantics:
/// last writer wins, no merge. Implementations are best-effort mirrors;
/// the local store stays authoritative on write.
pub trait RemoteStore: Send + Sync {
    /// Load the remote record for a user.
    fn load_remote(&self, user_id: &str) -> Result<Option<ChallengeState>>;

    /// Upsert the remote record for a user.
    fn save_remote(&self, user_id: &str, state: &ChallengeState) -> Result<()>;

    /// Health check: whether the remote is reachable right now.
    fn ping(&self) -> bool;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

/// Blanket implementation of RemoteStore for Arc-wrapped stores.
impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    fn load_remote(&self, user_id: &str) -> Result<Option<ChallengeState>> {
        (**self).load_remote(user_id)
    }

    fn save_remote(&self, user_id: &str, state: &ChallengeState) -> Result<()> {
        (**self).save_remote(user_id, state)
    }

    fn ping(&self) -> bool {
        (**self).ping()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Test utilities for ChallengeStore implementations.
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::core::{default_rules, initialize};

    /// Exercise the load/save/clear contract of a store implementation.
    pub fn test_challenge_store_contract<S: ChallengeStore>(store: &S) {
        assert!(store.is_available());
        assert!(!store.exists().unwrap());
        assert!(store.load().unwrap().is_none());

        let state = initialize(default_rules(), "2026-06-01").unwrap();
        store.save(&state).unwrap();

        assert!(store.exists().unwrap());
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, state);

        // Save replaces the whole record.
        let mut updated = state.clone();
        updated.challenge.current_streak = 7;
        store.save(&updated).unwrap();
        assert_eq!(store.load().unwrap().unwrap().challenge.current_streak, 7);

        store.clear().unwrap();
        assert!(!store.exists().unwrap());
        assert!(store.load().unwrap().is_none());

        // Clearing again succeeds.
        store.clear().unwrap();
    }
}
