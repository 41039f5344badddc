//! smart75 - 75-day commitment challenge tracker
//!
//! A user defines a small set of daily rules, checks them off each day, and
//! smart75 tracks streaks, enforces the miss-two-consecutive-days reset
//! policy, and reports statistics. State lives in a single JSON record;
//! every change is a pure old-value to new-value transition handed whole to
//! the storage layer, with an optional remote mirror behind the local file.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod stats;
pub mod storage;
pub mod util;

pub use config::Config;
pub use crate::core::{
    check_for_reset, check_for_victory, check_for_warning, current_day, today_key,
    ChallengeMeta, ChallengeState, DailyLog, Rule, CHALLENGE_DAYS,
};
pub use error::{FailOpen, Result, Smart75Error};
pub use stats::{compute, ChallengeStats, ExportDocument, RuleStat};
pub use storage::{
    ChallengeStore, DirRemoteStore, FileChallengeStore, MemoryChallengeStore, MemoryRemoteStore,
    RemoteStore, TieredStore,
};

// CLI commands
pub use cli::{
    ClearCommand, ExportCommand, InitCommand, LogCommand, MigrateCommand, ReflectCommand,
    ResetCommand, RulesCommand, StartDateCommand, StatsCommand, StatusCommand, ToggleCommand,
    VictoryCommand,
};
