//! Status command: today's checklist plus warning, reset, and victory
//! checks.
//!
//! This is the once-per-load evaluation point: the reset check runs here,
//! before the user interacts, so a required reset is surfaced first.

use serde::Serialize;

use crate::cli::{render, OutputOptions};
use crate::core::{
    check_for_reset, check_for_victory, check_for_warning, current_day, today_progress,
    ChallengeState, CHALLENGE_DAYS,
};
use crate::storage::ChallengeStore;

/// One checklist line in the status output.
#[derive(Debug, Clone, Serialize)]
pub struct RuleLine {
    /// Rule identifier.
    pub id: u32,
    /// Rule text.
    pub text: String,
    /// Whether the rule is checked off today.
    pub completed: bool,
}

/// Output format for the status command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    /// Whether a challenge exists.
    pub initialized: bool,
    /// 1-indexed current day, capped at the cycle length.
    pub current_day: i64,
    /// Cycle length in days.
    pub total_days: i64,
    /// Percent of today's rules checked off.
    pub progress_percent: u8,
    /// Current streak.
    pub current_streak: u32,
    /// Today's checklist.
    pub rules: Vec<RuleLine>,
    /// Today's reflection, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
    /// One miss happened; one more resets the challenge.
    pub show_warning: bool,
    /// Two consecutive misses; the challenge must reset.
    pub needs_reset: bool,
    /// Missed day count behind `needs_reset`.
    pub missed_days: u32,
    /// Day 75 reached and not yet acknowledged.
    pub victory: bool,
}

impl StatusOutput {
    fn uninitialized() -> Self {
        Self {
            initialized: false,
            current_day: 0,
            total_days: CHALLENGE_DAYS,
            progress_percent: 0,
            current_streak: 0,
            rules: Vec::new(),
            reflection: None,
            show_warning: false,
            needs_reset: false,
            missed_days: 0,
            victory: false,
        }
    }
}

/// The status command implementation.
pub struct StatusCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> StatusCommand<S> {
    /// Create a new status command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the status command.
    pub fn run(&self, today: &str) -> StatusOutput {
        let Ok(Some(state)) = self.store.load() else {
            return StatusOutput::uninitialized();
        };

        Self::from_state(&state, today)
    }

    fn from_state(state: &ChallengeState, today: &str) -> StatusOutput {
        let reset = check_for_reset(state, today);
        let warning = check_for_warning(state, today);
        let today_log = state.log_for(today);

        let rules = state
            .rules
            .iter()
            .map(|rule| RuleLine {
                id: rule.id,
                text: rule.text.clone(),
                completed: today_log.map(|l| l.is_completed(rule.id)).unwrap_or(false),
            })
            .collect();

        StatusOutput {
            initialized: true,
            current_day: current_day(state, today).min(CHALLENGE_DAYS),
            total_days: CHALLENGE_DAYS,
            progress_percent: today_progress(state, today),
            current_streak: state.challenge.current_streak,
            rules,
            reflection: today_log
                .filter(|l| !l.reflection.is_empty())
                .map(|l| l.reflection.clone()),
            show_warning: warning.show_warning,
            needs_reset: reset.needs_reset,
            missed_days: reset.missed_days,
            victory: check_for_victory(state, today),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatusOutput, options: &OutputOptions) -> String {
        render(output, options, || Self::format_human(output))
    }

    fn format_human(output: &StatusOutput) -> String {
        if !output.initialized {
            return "No active challenge. Run `smart75 init` to start one.\n".to_string();
        }

        let mut out = format!(
            "Day {} / {}  ·  streak {}  ·  today {}%\n",
            output.current_day, output.total_days, output.current_streak, output.progress_percent
        );

        if output.needs_reset {
            out.push_str(&format!(
                "\n!! You missed {} consecutive days. Run `smart75 reset` to restart at Day 1.\n",
                output.missed_days
            ));
        } else if output.show_warning {
            out.push_str(
                "\n! You missed yesterday. Miss another day and the challenge resets.\n",
            );
        }

        if output.victory {
            out.push_str("\n*** Day 75 reached! Run `smart75 victory` to celebrate. ***\n");
        }

        out.push('\n');
        for (index, rule) in output.rules.iter().enumerate() {
            let mark = if rule.completed { "x" } else { " " };
            out.push_str(&format!(
                "  [{}] {:02}  {}\n",
                mark,
                index + 1,
                rule.text
            ));
        }

        if let Some(reflection) = &output.reflection {
            out.push_str(&format!("\nReflection: {reflection}\n"));
        }

        out
    }
}
