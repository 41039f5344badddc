//! Challenge state transitions.
//!
//! Each transition takes the current state (or none) plus action parameters
//! and returns a new state; the caller hands the result to storage as a
//! full-value replacement. Precondition violations return a validation
//! error and leave the input untouched. `today` is always an explicit
//! parameter: nothing in here reads the clock.

use crate::core::date::is_valid_day_key;
use crate::core::state::{validate_rules, ChallengeMeta, ChallengeState, Rule};
use crate::error::{Result, Smart75Error};

/// Start a fresh challenge.
///
/// Preconditions: 3-8 rules with non-empty text and unique ids, and a
/// well-formed start date. Day 1 is the start date itself.
pub fn initialize(rules: Vec<Rule>, start_date: &str) -> Result<ChallengeState> {
    validate_rules(&rules)?;
    if !is_valid_day_key(start_date) {
        return Err(Smart75Error::validation(format!(
            "invalid start date: {start_date}"
        )));
    }

    Ok(ChallengeState {
        rules,
        challenge: ChallengeMeta::started(start_date),
        daily_logs: Default::default(),
    })
}

/// Flip a rule's membership in today's completed set.
///
/// Recomputes today's `allComplete` against the current rule set and does
/// the incremental streak bookkeeping: +1 when the day transitions
/// incomplete -> complete, -1 on the way back. `longestStreak` is only
/// consulted on the increment path. Streak state is never recomputed by
/// scanning history; only today's toggle moves it.
pub fn toggle_task(state: &ChallengeState, rule_id: u32, today: &str) -> Result<ChallengeState> {
    if state.rule(rule_id).is_none() {
        return Err(Smart75Error::validation(format!(
            "no rule with id {rule_id}"
        )));
    }

    let mut next = state.clone();
    let rule_ids = next.rule_ids();
    let log = next.daily_logs.entry(today.to_string()).or_default();

    let was_complete = log.all_complete;
    let mut completed = log.completed.clone();
    if let Some(pos) = completed.iter().position(|&id| id == rule_id) {
        completed.remove(pos);
    } else {
        completed.push(rule_id);
    }
    log.set_completed(completed, &rule_ids);
    let now_complete = log.all_complete;

    if now_complete && !was_complete {
        next.challenge.current_streak += 1;
        next.challenge.longest_streak = next
            .challenge
            .longest_streak
            .max(next.challenge.current_streak);
    } else if was_complete && !now_complete {
        next.challenge.current_streak = next.challenge.current_streak.saturating_sub(1);
    }

    Ok(next)
}

/// Replace today's reflection text.
pub fn set_reflection(state: &ChallengeState, text: &str, today: &str) -> ChallengeState {
    let mut next = state.clone();
    let log = next.daily_logs.entry(today.to_string()).or_default();
    log.reflection = text.to_string();
    next
}

/// Restart the challenge at day 1.
///
/// Sets the start date to today and clears all daily logs. The current
/// streak drops to zero and the reset counter increments; the longest
/// streak survives as a lifetime best. The victory flag clears so a new
/// cycle can be won again.
pub fn reset_challenge(state: &ChallengeState, today: &str) -> ChallengeState {
    let mut next = state.clone();
    next.challenge.start_date = Some(today.to_string());
    next.challenge.current_day = 1;
    next.challenge.current_streak = 0;
    next.challenge.total_resets += 1;
    next.challenge.victory_shown = false;
    next.daily_logs.clear();
    next
}

/// Move the challenge start date.
///
/// Day-index semantics shift with the start date, so logs tied to the old
/// date range are discarded.
pub fn update_start_date(state: &ChallengeState, new_date: &str) -> Result<ChallengeState> {
    if !is_valid_day_key(new_date) {
        return Err(Smart75Error::validation(format!(
            "invalid start date: {new_date}"
        )));
    }

    let mut next = state.clone();
    next.challenge.start_date = Some(new_date.to_string());
    next.daily_logs.clear();
    Ok(next)
}

/// Replace the rule set and restart the challenge.
pub fn update_rules(
    state: &ChallengeState,
    new_rules: Vec<Rule>,
    today: &str,
) -> Result<ChallengeState> {
    validate_rules(&new_rules)?;
    let mut next = reset_challenge(state, today);
    next.rules = new_rules;
    Ok(next)
}

/// Replace the rule set, keeping progress.
///
/// Daily logs are retained as-is: old entries may reference rule ids that
/// no longer exist, and their cached `allComplete` flags are not
/// retroactively corrected.
pub fn update_rules_without_reset(
    state: &ChallengeState,
    new_rules: Vec<Rule>,
) -> Result<ChallengeState> {
    validate_rules(&new_rules)?;
    let mut next = state.clone();
    next.rules = new_rules;
    Ok(next)
}

/// Record that the day-75 victory has been shown and counted.
pub fn acknowledge_victory(state: &ChallengeState) -> ChallengeState {
    let mut next = state.clone();
    next.challenge.victory_shown = true;
    next.challenge.total_completions += 1;
    next
}
