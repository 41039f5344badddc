//! Toggle command: flip a rule's completion for today.

use serde::Serialize;

use crate::cli::{load_required, render, OutputOptions};
use crate::core::toggle_task;
use crate::storage::ChallengeStore;

/// Output format for the toggle command.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutput {
    /// Whether the toggle was applied.
    pub success: bool,
    /// The rule that was toggled.
    pub rule_id: u32,
    /// Whether the rule is now checked off.
    pub completed: bool,
    /// Whether today is now fully complete.
    pub all_complete: bool,
    /// Current streak after the toggle.
    pub current_streak: u32,
    /// Error message if the toggle failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToggleOutput {
    fn failure(rule_id: u32, error: impl Into<String>) -> Self {
        Self {
            success: false,
            rule_id,
            completed: false,
            all_complete: false,
            current_streak: 0,
            error: Some(error.into()),
        }
    }
}

/// The toggle command implementation.
pub struct ToggleCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> ToggleCommand<S> {
    /// Create a new toggle command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the toggle command.
    pub fn run(&self, rule_id: u32, today: &str) -> ToggleOutput {
        let state = match load_required(&self.store) {
            Ok(state) => state,
            Err(err) => return ToggleOutput::failure(rule_id, err.to_string()),
        };

        let next = match toggle_task(&state, rule_id, today) {
            Ok(next) => next,
            Err(err) => return ToggleOutput::failure(rule_id, err.to_string()),
        };

        if let Err(err) = self.store.save(&next) {
            return ToggleOutput::failure(rule_id, err.to_string());
        }

        let log = next.log_for(today);
        ToggleOutput {
            success: true,
            rule_id,
            completed: log.map(|l| l.is_completed(rule_id)).unwrap_or(false),
            all_complete: log.map(|l| l.all_complete).unwrap_or(false),
            current_streak: next.challenge.current_streak,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ToggleOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if output.success {
                let mut text = format!(
                    "Rule {} {}.\n",
                    output.rule_id,
                    if output.completed { "done" } else { "unchecked" }
                );
                if output.all_complete {
                    text.push_str(&format!(
                        "All tasks complete. Streak: {}.\n",
                        output.current_streak
                    ));
                }
                text
            } else {
                format!(
                    "Toggle failed: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{default_rules, initialize};
    use crate::storage::MemoryChallengeStore;
    use std::sync::Arc;

    const TODAY: &str = "2026-06-10";

    fn setup() -> (Arc<MemoryChallengeStore>, ToggleCommand<Arc<MemoryChallengeStore>>) {
        let store = Arc::new(MemoryChallengeStore::new());
        store
            .save(&initialize(default_rules(), TODAY).unwrap())
            .unwrap();
        let command = ToggleCommand::new(store.clone());
        (store, command)
    }

    #[test]
    fn test_toggle_on_then_off() {
        let (_store, command) = setup();

        let on = command.run(1, TODAY);
        assert!(on.success);
        assert!(on.completed);
        assert!(!on.all_complete);

        let off = command.run(1, TODAY);
        assert!(off.success);
        assert!(!off.completed);
    }

    #[test]
    fn test_toggle_persists() {
        let (store, command) = setup();

        command.run(1, TODAY);
        let state = store.load().unwrap().unwrap();
        assert!(state.log_for(TODAY).unwrap().is_completed(1));
    }

    #[test]
    fn test_toggle_completing_day_reports_streak() {
        let (_store, command) = setup();

        let mut last = command.run(1, TODAY);
        for id in 2..=6 {
            last = command.run(id, TODAY);
        }
        assert!(last.all_complete);
        assert_eq!(last.current_streak, 1);
    }

    #[test]
    fn test_toggle_unknown_rule() {
        let (_store, command) = setup();

        let output = command.run(42, TODAY);
        assert!(!output.success);
        assert!(output.error.unwrap().contains("no rule with id 42"));
    }

    #[test]
    fn test_toggle_without_challenge() {
        let store = Arc::new(MemoryChallengeStore::new());
        let command = ToggleCommand::new(store);

        let output = command.run(1, TODAY);
        assert!(!output.success);
        assert!(output.error.unwrap().contains("no active challenge"));
    }

    #[test]
    fn test_format_output() {
        let (_store, command) = setup();
        let output = command.run(1, TODAY);

        let text = command.format_output(&output, &OutputOptions::default());
        assert!(text.contains("Rule 1 done"));
    }
}
