//! Challenge state types for smart75.
//!
//! These types form the single persisted aggregate: the rule set, challenge
//! metadata, and per-day completion logs. The aggregate is always written
//! whole; transitions replace the entire value at the persistence boundary.
//!
//! Serialized field names are camelCase to match the persisted record
//! format, so backups exported by earlier builds import unchanged.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, Smart75Error};

/// Minimum number of rules in an active challenge.
pub const MIN_RULES: usize = 3;

/// Maximum number of rules in an active challenge.
pub const MAX_RULES: usize = 8;

/// A single daily commitment item.
///
/// Rule identity (`id`) is the join key into per-day completion records and
/// is stable across edits unless the rule set is replaced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    /// Unique rule identifier.
    pub id: u32,
    /// What the user commits to doing every day.
    pub text: String,
}

impl Rule {
    /// Create a new rule.
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// The stock rule set offered at onboarding.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(1, "Deep Learning Session 1 (30-45 min)"),
        Rule::new(2, "Deep Learning Session 2 (30-45 min)"),
        Rule::new(3, "15 min Meta-Learning"),
        Rule::new(4, "Create 1 Intellectual Output"),
        Rule::new(5, "Read 10 Pages Non-Fiction"),
        Rule::new(6, "No Low-Value Dopamine Before 8pm"),
    ]
}

/// Validate a candidate rule set.
///
/// Enforces the rule-count bound, non-empty text, and unique ids. Used by
/// every transition that installs a rule set; a violation means the
/// transition must not be applied.
pub fn validate_rules(rules: &[Rule]) -> Result<()> {
    if rules.len() < MIN_RULES || rules.len() > MAX_RULES {
        return Err(Smart75Error::validation(format!(
            "a challenge needs between {} and {} rules, got {}",
            MIN_RULES,
            MAX_RULES,
            rules.len()
        )));
    }

    let mut seen = BTreeSet::new();
    for rule in rules {
        if rule.text.trim().is_empty() {
            return Err(Smart75Error::validation(format!(
                "rule {} has empty text",
                rule.id
            )));
        }
        if !seen.insert(rule.id) {
            return Err(Smart75Error::validation(format!(
                "duplicate rule id {}",
                rule.id
            )));
        }
    }

    Ok(())
}

/// One day's completion record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyLog {
    /// Rule ids marked done that day. Set semantics: no duplicates.
    pub completed: Vec<u32>,
    /// Cached flag: `completed` equals the full rule-id set at the time of
    /// the last write. Only `set_completed` assigns it.
    pub all_complete: bool,
    /// Free-text reflection for the day.
    pub reflection: String,
}

impl DailyLog {
    /// Check whether a rule is marked done in this log.
    pub fn is_completed(&self, rule_id: u32) -> bool {
        self.completed.contains(&rule_id)
    }

    /// Replace the completed set and recompute the cached `all_complete`
    /// flag against the current rule-id set.
    ///
    /// This is the single writer of both fields: callers never assign
    /// `all_complete` directly, so the pair cannot drift apart.
    pub fn set_completed(&mut self, completed: Vec<u32>, current_rule_ids: &BTreeSet<u32>) {
        let mut deduped = Vec::with_capacity(completed.len());
        let mut seen = BTreeSet::new();
        for id in completed {
            if seen.insert(id) {
                deduped.push(id);
            }
        }

        self.all_complete = !current_rule_ids.is_empty() && seen == *current_rule_ids;
        self.completed = deduped;
    }
}

/// Challenge metadata: start date, streaks, and lifetime counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeMeta {
    /// Day key of day 1, `None` before a challenge is started.
    pub start_date: Option<String>,
    /// Informational only; always recomputed from `start_date` + clock.
    pub current_day: u32,
    /// Consecutive fully-complete days ending at the most recent one.
    pub current_streak: u32,
    /// Best streak ever achieved. Never decreases.
    pub longest_streak: u32,
    /// Number of resets, automatic or manual.
    pub total_resets: u32,
    /// Reserved counter, carried for record compatibility.
    pub failure_fund: u32,
    /// Whether the day-75 victory has been acknowledged.
    pub victory_shown: bool,
    /// Count of full 75-day completions.
    pub total_completions: u32,
}

impl Default for ChallengeMeta {
    fn default() -> Self {
        Self {
            start_date: None,
            current_day: 0,
            current_streak: 0,
            longest_streak: 0,
            total_resets: 0,
            failure_fund: 0,
            victory_shown: false,
            total_completions: 0,
        }
    }
}

impl ChallengeMeta {
    /// Metadata for a freshly started challenge.
    pub fn started(start_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            current_day: 1,
            ..Self::default()
        }
    }
}

/// The root aggregate: rules, metadata, and daily logs.
///
/// This is the single unit of persistence. Transitions produce a new value
/// from an old one; nothing mutates in place across the storage boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeState {
    /// Ordered rule set, 3-8 entries while a challenge is active.
    pub rules: Vec<Rule>,
    /// Challenge metadata.
    pub challenge: ChallengeMeta,
    /// Per-day logs keyed by `YYYY-MM-DD`.
    pub daily_logs: BTreeMap<String, DailyLog>,
}

impl ChallengeState {
    /// The current rule-id set.
    pub fn rule_ids(&self) -> BTreeSet<u32> {
        self.rules.iter().map(|r| r.id).collect()
    }

    /// Look up a rule by id.
    pub fn rule(&self, rule_id: u32) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == rule_id)
    }

    /// The log for a given day, if one exists.
    pub fn log_for(&self, day_key: &str) -> Option<&DailyLog> {
        self.daily_logs.get(day_key)
    }

    /// Whether a day is fully complete. A missing log is always incomplete.
    pub fn day_complete(&self, day_key: &str) -> bool {
        self.log_for(day_key).map(|l| l.all_complete).unwrap_or(false)
    }
}
