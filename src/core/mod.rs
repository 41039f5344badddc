//! Core types and logic for smart75.
//!
//! This module contains the challenge data model, day-key arithmetic, the
//! pure derivation functions (day counting, warning/reset/victory checks),
//! and the state transitions.

pub mod date;
pub mod derive;
pub mod state;
pub mod transition;

pub use date::{day_offset, days_between, is_valid_day_key, parse_day_key, today_key};
pub use derive::{
    check_for_reset, check_for_victory, check_for_warning, current_day, day_status,
    today_progress, DayStatus, ResetCheck, WarningCheck, CHALLENGE_DAYS,
};
pub use state::{
    default_rules, validate_rules, ChallengeMeta, ChallengeState, DailyLog, Rule, MAX_RULES,
    MIN_RULES,
};
pub use transition::{
    acknowledge_victory, initialize, reset_challenge, set_reflection, toggle_task,
    update_rules, update_rules_without_reset, update_start_date,
};
