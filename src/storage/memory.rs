//! In-memory challenge storage for testing.
//!
//! Thread-safe implementations of both storage traits. The availability
//! and failure toggles let tests exercise the unavailable-storage and
//! remote fail-open paths without touching a filesystem.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::core::ChallengeState;
use crate::error::{Result, Smart75Error};
use crate::storage::{ChallengeStore, RemoteStore};

/// In-memory challenge record store for testing.
#[derive(Debug, Default)]
pub struct MemoryChallengeStore {
    record: RwLock<Option<ChallengeState>>,
    unavailable: AtomicBool,
}

impl MemoryChallengeStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `is_available` report false.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl ChallengeStore for MemoryChallengeStore {
    fn load(&self) -> Result<Option<ChallengeState>> {
        Ok(self.record.read().unwrap().clone())
    }

    fn save(&self, state: &ChallengeState) -> Result<()> {
        *self.record.write().unwrap() = Some(state.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.record.write().unwrap() = None;
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.unavailable.load(Ordering::SeqCst)
    }
}

/// In-memory remote store for testing the mirror and migration paths.
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    records: RwLock<HashMap<String, ChallengeState>>,
    failing: AtomicBool,
}

impl MemoryRemoteStore {
    /// Create a new empty in-memory remote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every remote call fail, as an unreachable backend would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of user records held.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Check if the remote holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(Smart75Error::remote("remote store is failing"))
        } else {
            Ok(())
        }
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn load_remote(&self, user_id: &str) -> Result<Option<ChallengeState>> {
        self.check()?;
        Ok(self.records.read().unwrap().get(user_id).cloned())
    }

    fn save_remote(&self, user_id: &str, state: &ChallengeState) -> Result<()> {
        self.check()?;
        self.records
            .write()
            .unwrap()
            .insert(user_id.to_string(), state.clone());
        Ok(())
    }

    fn ping(&self) -> bool {
        !self.failing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
