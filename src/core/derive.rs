//! Derived challenge state: day counting, warnings, reset and victory
//! checks.
//!
//! Every function here is pure: given `(state, today)` it returns a result
//! with no side effects and no ambient clock access. Missing logs always
//! count as incomplete, and malformed or unset start dates degrade to
//! "day 0" rather than erroring.

use crate::core::date::{day_offset, days_between};
use crate::core::state::ChallengeState;

/// Length of one challenge cycle in days.
pub const CHALLENGE_DAYS: i64 = 75;

/// Result of the missed-yesterday warning check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarningCheck {
    /// One miss has occurred and a second will trigger a reset.
    pub show_warning: bool,
}

/// Result of the two-consecutive-misses reset check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetCheck {
    /// Both yesterday and the day before were incomplete.
    pub needs_reset: bool,
    /// Number of missed days that triggered the reset (always 2 when set).
    pub missed_days: u32,
}

impl ResetCheck {
    fn clear() -> Self {
        Self {
            needs_reset: false,
            missed_days: 0,
        }
    }
}

/// 1-indexed current day of the challenge.
///
/// Day 1 is the start date itself. Returns 0 when no start date is set (or
/// it does not parse). Values are not capped at the cycle length; callers
/// cap display at [`CHALLENGE_DAYS`].
pub fn current_day(state: &ChallengeState, today: &str) -> i64 {
    let Some(start) = state.challenge.start_date.as_deref() else {
        return 0;
    };
    match days_between(start, today) {
        Some(diff) => diff + 1,
        None => 0,
    }
}

/// Check whether the user should be warned about a missed day.
///
/// Fires only on the *first* missed day following either the challenge
/// start or a previously-complete day: exactly when one more miss away
/// from a reset. The two arms of the final condition are deliberately
/// independent of the reset check below.
pub fn check_for_warning(state: &ChallengeState, today: &str) -> WarningCheck {
    let day = current_day(state, today);
    if day <= 1 {
        return WarningCheck { show_warning: false };
    }

    let yesterday_complete = day_offset(today, -1)
        .map(|k| state.day_complete(&k))
        .unwrap_or(false);
    if yesterday_complete {
        return WarningCheck { show_warning: false };
    }

    let day_before_complete = day_offset(today, -2)
        .map(|k| state.day_complete(&k))
        .unwrap_or(false);

    WarningCheck {
        show_warning: day <= 2 || day_before_complete,
    }
}

/// Check whether two consecutive missed days require a reset.
///
/// Idempotent for a given `(state, today)`; intended to run once per state
/// load, before the user interacts. A missing log counts as incomplete.
/// Day 1 and 2 never trigger: there is not enough history to judge.
pub fn check_for_reset(state: &ChallengeState, today: &str) -> ResetCheck {
    let day = current_day(state, today);
    if day <= 2 {
        return ResetCheck::clear();
    }

    let complete = |offset: i64| {
        day_offset(today, offset)
            .map(|k| state.day_complete(&k))
            .unwrap_or(false)
    };

    if !complete(-1) && !complete(-2) {
        ResetCheck {
            needs_reset: true,
            missed_days: 2,
        }
    } else {
        ResetCheck::clear()
    }
}

/// Check whether the challenge has been won and not yet acknowledged.
pub fn check_for_victory(state: &ChallengeState, today: &str) -> bool {
    current_day(state, today) >= CHALLENGE_DAYS && !state.challenge.victory_shown
}

/// Percent of today's rules checked off, 0-100. Zero when no rules exist.
pub fn today_progress(state: &ChallengeState, today: &str) -> u8 {
    if state.rules.is_empty() {
        return 0;
    }
    let completed = state
        .log_for(today)
        .map(|log| log.completed.len())
        .unwrap_or(0);
    ((completed as f64 / state.rules.len() as f64) * 100.0).round() as u8
}

/// Classification of a calendar day for the log view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    /// Before the challenge start (or no challenge).
    Outside,
    /// After today; nothing to judge yet.
    Future,
    /// Today itself; the day is not over.
    Today,
    /// Past day with every rule complete.
    Complete,
    /// Past day missed or only partially complete.
    Incomplete,
}

/// Classify a day relative to the challenge window and its log.
pub fn day_status(state: &ChallengeState, day_key: &str, today: &str) -> DayStatus {
    let Some(start) = state.challenge.start_date.as_deref() else {
        return DayStatus::Outside;
    };
    let Some(from_start) = days_between(start, day_key) else {
        return DayStatus::Outside;
    };
    if from_start < 0 {
        return DayStatus::Outside;
    }

    match days_between(today, day_key) {
        Some(0) => DayStatus::Today,
        Some(d) if d > 0 => DayStatus::Future,
        Some(_) => {
            if state.day_complete(day_key) {
                DayStatus::Complete
            } else {
                DayStatus::Incomplete
            }
        }
        None => DayStatus::Outside,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::date::day_offset;
    use crate::core::state::{default_rules, ChallengeMeta, ChallengeState, DailyLog};

    const TODAY: &str = "2026-06-10";

    fn state_started_days_ago(days: i64) -> ChallengeState {
        ChallengeState {
            rules: default_rules(),
            challenge: ChallengeMeta::started(day_offset(TODAY, -days).unwrap()),
            ..Default::default()
        }
    }

    fn mark_complete(state: &mut ChallengeState, day_key: &str) {
        let rule_ids = state.rule_ids();
        let mut log = DailyLog::default();
        log.set_completed(rule_ids.iter().copied().collect(), &rule_ids);
        state.daily_logs.insert(day_key.to_string(), log);
    }

    fn mark_partial(state: &mut ChallengeState, day_key: &str) {
        let rule_ids = state.rule_ids();
        let mut log = DailyLog::default();
        log.set_completed(vec![1], &rule_ids);
        state.daily_logs.insert(day_key.to_string(), log);
    }

    // current_day

    #[test]
    fn test_current_day_is_one_on_start_date() {
        let state = state_started_days_ago(0);
        assert_eq!(current_day(&state, TODAY), 1);
    }

    #[test]
    fn test_current_day_counts_from_start() {
        assert_eq!(current_day(&state_started_days_ago(1), TODAY), 2);
        assert_eq!(current_day(&state_started_days_ago(74), TODAY), 75);
        assert_eq!(current_day(&state_started_days_ago(100), TODAY), 101);
    }

    #[test]
    fn test_current_day_zero_without_start_date() {
        let state = ChallengeState::default();
        assert_eq!(current_day(&state, TODAY), 0);
    }

    #[test]
    fn test_current_day_zero_for_malformed_start_date() {
        let mut state = state_started_days_ago(5);
        state.challenge.start_date = Some("not-a-date".to_string());
        assert_eq!(current_day(&state, TODAY), 0);
    }

    #[test]
    fn test_current_day_future_start_is_not_positive() {
        let state = state_started_days_ago(-3);
        assert_eq!(current_day(&state, TODAY), -2);
    }

    // check_for_warning

    #[test]
    fn test_no_warning_on_day_one() {
        let state = state_started_days_ago(0);
        assert!(!check_for_warning(&state, TODAY).show_warning);
    }

    #[test]
    fn test_warning_on_day_two_after_missed_day_one() {
        let state = state_started_days_ago(1);
        assert!(check_for_warning(&state, TODAY).show_warning);
    }

    #[test]
    fn test_warning_when_yesterday_missed_but_day_before_complete() {
        let mut state = state_started_days_ago(5);
        mark_complete(&mut state, &day_offset(TODAY, -2).unwrap());
        assert!(check_for_warning(&state, TODAY).show_warning);
    }

    #[test]
    fn test_no_warning_when_yesterday_complete() {
        let mut state = state_started_days_ago(5);
        mark_complete(&mut state, &day_offset(TODAY, -1).unwrap());
        assert!(!check_for_warning(&state, TODAY).show_warning);
    }

    #[test]
    fn test_no_warning_when_both_prior_days_missed() {
        // Two consecutive misses are the reset condition, which supersedes
        // the warning.
        let state = state_started_days_ago(5);
        assert!(!check_for_warning(&state, TODAY).show_warning);
    }

    #[test]
    fn test_partial_day_counts_as_missed_for_warning() {
        let mut state = state_started_days_ago(5);
        mark_partial(&mut state, &day_offset(TODAY, -1).unwrap());
        mark_complete(&mut state, &day_offset(TODAY, -2).unwrap());
        assert!(check_for_warning(&state, TODAY).show_warning);
    }

    // check_for_reset

    #[test]
    fn test_no_reset_before_day_three() {
        assert!(!check_for_reset(&state_started_days_ago(0), TODAY).needs_reset);
        assert!(!check_for_reset(&state_started_days_ago(1), TODAY).needs_reset);
    }

    #[test]
    fn test_no_reset_without_challenge() {
        let state = ChallengeState::default();
        assert!(!check_for_reset(&state, TODAY).needs_reset);
    }

    #[test]
    fn test_reset_when_both_days_unlogged() {
        let check = check_for_reset(&state_started_days_ago(5), TODAY);
        assert!(check.needs_reset);
        assert_eq!(check.missed_days, 2);
    }

    #[test]
    fn test_reset_when_both_days_incomplete() {
        let mut state = state_started_days_ago(5);
        mark_partial(&mut state, &day_offset(TODAY, -1).unwrap());
        mark_partial(&mut state, &day_offset(TODAY, -2).unwrap());
        assert!(check_for_reset(&state, TODAY).needs_reset);
    }

    #[test]
    fn test_no_reset_when_yesterday_complete() {
        let mut state = state_started_days_ago(5);
        mark_complete(&mut state, &day_offset(TODAY, -1).unwrap());
        assert!(!check_for_reset(&state, TODAY).needs_reset);
    }

    #[test]
    fn test_no_reset_when_day_before_complete() {
        let mut state = state_started_days_ago(5);
        mark_complete(&mut state, &day_offset(TODAY, -2).unwrap());
        assert!(!check_for_reset(&state, TODAY).needs_reset);
    }

    #[test]
    fn test_reset_implies_warning_on_previous_day() {
        // Whenever the reset fires, the preceding day must have offered a
        // warning: the reset never arrives unannounced.
        let state = state_started_days_ago(5);
        let yesterday = day_offset(TODAY, -1).unwrap();

        assert!(check_for_reset(&state, TODAY).needs_reset);
        assert!(check_for_warning(&state, &yesterday).show_warning
            || check_for_reset(&state, &yesterday).needs_reset);
    }

    // check_for_victory

    #[test]
    fn test_victory_at_day_75() {
        let state = state_started_days_ago(74);
        assert!(check_for_victory(&state, TODAY));
    }

    #[test]
    fn test_no_victory_before_day_75() {
        let state = state_started_days_ago(73);
        assert!(!check_for_victory(&state, TODAY));
    }

    #[test]
    fn test_no_victory_after_acknowledgement() {
        let mut state = state_started_days_ago(74);
        state.challenge.victory_shown = true;
        assert!(!check_for_victory(&state, TODAY));
    }

    // today_progress

    #[test]
    fn test_today_progress_empty() {
        let state = state_started_days_ago(0);
        assert_eq!(today_progress(&state, TODAY), 0);
    }

    #[test]
    fn test_today_progress_partial_and_full() {
        let mut state = state_started_days_ago(0);
        let rule_ids = state.rule_ids();

        let mut log = DailyLog::default();
        log.set_completed(vec![1, 2, 3], &rule_ids);
        state.daily_logs.insert(TODAY.to_string(), log);
        assert_eq!(today_progress(&state, TODAY), 50);

        mark_complete(&mut state, TODAY);
        assert_eq!(today_progress(&state, TODAY), 100);
    }

    #[test]
    fn test_today_progress_no_rules() {
        let state = ChallengeState::default();
        assert_eq!(today_progress(&state, TODAY), 0);
    }

    // day_status

    #[test]
    fn test_day_status_classification() {
        let mut state = state_started_days_ago(5);
        mark_complete(&mut state, &day_offset(TODAY, -3).unwrap());

        let start = state.challenge.start_date.clone().unwrap();
        assert_eq!(
            day_status(&state, &day_offset(&start, -1).unwrap(), TODAY),
            DayStatus::Outside
        );
        assert_eq!(day_status(&state, TODAY, TODAY), DayStatus::Today);
        assert_eq!(
            day_status(&state, &day_offset(TODAY, 1).unwrap(), TODAY),
            DayStatus::Future
        );
        assert_eq!(
            day_status(&state, &day_offset(TODAY, -3).unwrap(), TODAY),
            DayStatus::Complete
        );
        assert_eq!(
            day_status(&state, &day_offset(TODAY, -1).unwrap(), TODAY),
            DayStatus::Incomplete
        );
    }

    #[test]
    fn test_day_status_without_challenge() {
        let state = ChallengeState::default();
        assert_eq!(day_status(&state, TODAY, TODAY), DayStatus::Outside);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // currentDay(start, start + n) == n + 1 for any n >= 0.
            #[test]
            fn prop_day_counting(n in 0i64..1000) {
                let state = state_started_days_ago(0);
                let start = state.challenge.start_date.clone().unwrap();
                let later = day_offset(&start, n).unwrap();
                prop_assert_eq!(current_day(&state, &later), n + 1);
            }

            // Progress is always within 0..=100.
            #[test]
            fn prop_progress_bounded(count in 0usize..=6) {
                let mut state = state_started_days_ago(0);
                let rule_ids = state.rule_ids();
                let picked: Vec<u32> = rule_ids.iter().copied().take(count).collect();
                let mut log = DailyLog::default();
                log.set_completed(picked, &rule_ids);
                state.daily_logs.insert(TODAY.to_string(), log);

                let progress = today_progress(&state, TODAY);
                prop_assert!(progress <= 100);
            }
        }
    }
}
