//! Challenge record storage for smart75.
//!
//! This module provides persistent storage for the challenge record,
//! supporting file-based, in-memory, and tiered local+remote backends.

pub mod file;
pub mod memory;
pub mod remote;
pub mod tiered;
pub mod traits;

pub use file::FileChallengeStore;
pub use memory::{MemoryChallengeStore, MemoryRemoteStore};
pub use remote::DirRemoteStore;
pub use tiered::TieredStore;
pub use traits::{ChallengeStore, RemoteStore};
