//! Read-only statistics over a challenge state.
//!
//! Rollups are recomputed on demand from the full log map; no caching is
//! needed because a log map is bounded by one entry per challenge day.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::derive::{current_day, CHALLENGE_DAYS};
use crate::core::state::ChallengeState;

/// Completion statistics for one rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleStat {
    /// Rule identifier.
    pub id: u32,
    /// Rule text.
    pub text: String,
    /// Number of logged days where this rule was completed.
    pub completed_count: u32,
    /// Percentage of logged days where this rule was completed, 0-100.
    pub percentage: u8,
}

/// Aggregate statistics for the whole challenge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeStats {
    /// 1-indexed current day, capped at the cycle length for display.
    pub current_day: i64,
    /// Total days with a log entry.
    pub days_logged: u32,
    /// Logged days with every rule complete.
    pub complete_days: u32,
    /// `complete_days / days_logged` as a rounded percentage, 0 when
    /// nothing is logged.
    pub completion_rate: u8,
    /// Current streak from challenge metadata.
    pub current_streak: u32,
    /// Longest streak from challenge metadata.
    pub longest_streak: u32,
    /// Lifetime reset count.
    pub total_resets: u32,
    /// Lifetime full-cycle completions.
    pub total_completions: u32,
    /// Per-rule breakdown in rule order.
    pub rules: Vec<RuleStat>,
}

/// Compute the full statistics rollup for a state.
pub fn compute(state: &ChallengeState, today: &str) -> ChallengeStats {
    let days_logged = state.daily_logs.len() as u32;
    let complete_days = state
        .daily_logs
        .values()
        .filter(|log| log.all_complete)
        .count() as u32;

    let rules = state
        .rules
        .iter()
        .map(|rule| {
            let completed_count = state
                .daily_logs
                .values()
                .filter(|log| log.is_completed(rule.id))
                .count() as u32;
            RuleStat {
                id: rule.id,
                text: rule.text.clone(),
                completed_count,
                percentage: ratio_percent(completed_count, days_logged),
            }
        })
        .collect();

    ChallengeStats {
        current_day: current_day(state, today).min(CHALLENGE_DAYS),
        days_logged,
        complete_days,
        completion_rate: ratio_percent(complete_days, days_logged),
        current_streak: state.challenge.current_streak,
        longest_streak: state.challenge.longest_streak,
        total_resets: state.challenge.total_resets,
        total_completions: state.challenge.total_completions,
        rules,
    }
}

fn ratio_percent(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u8
    }
}

/// The downloadable backup document: the state plus an export timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// When the export was produced (RFC 3339).
    pub export_date: String,
    /// The full persisted aggregate.
    #[serde(flatten)]
    pub state: ChallengeState,
}

impl ExportDocument {
    /// Build an export document stamped with the current instant.
    pub fn new(state: &ChallengeState) -> Self {
        Self {
            export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            state: state.clone(),
        }
    }
}

/// Backup file name for a given day: `smart75-backup-<YYYY-MM-DD>.json`.
pub fn export_file_name(today: &str) -> String {
    format!("smart75-backup-{today}.json")
}
