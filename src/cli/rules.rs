//! Rules command: list or replace the rule set.
//!
//! Replacing rules restarts the challenge by default; `keep_logs` swaps
//! the rule set in place and accepts that old logs may reference stale
//! rule ids.

use serde::Serialize;

use crate::cli::{load_required, render, rules_from_texts, OutputOptions};
use crate::core::{update_rules, update_rules_without_reset, Rule};
use crate::storage::ChallengeStore;

/// Output format for the rules command.
#[derive(Debug, Clone, Serialize)]
pub struct RulesOutput {
    /// Whether the command succeeded.
    pub success: bool,
    /// The active rule set after the command.
    pub rules: Vec<Rule>,
    /// Whether the challenge was reset as part of the change.
    pub reset: bool,
    /// Error message if the command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RulesOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            rules: Vec::new(),
            reset: false,
            error: Some(error.into()),
        }
    }
}

/// The rules command implementation.
pub struct RulesCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> RulesCommand<S> {
    /// Create a new rules command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List the active rules.
    pub fn list(&self) -> RulesOutput {
        match load_required(&self.store) {
            Ok(state) => RulesOutput {
                success: true,
                rules: state.rules,
                reset: false,
                error: None,
            },
            Err(err) => RulesOutput::failure(err.to_string()),
        }
    }

    /// Replace the rule set.
    ///
    /// With `keep_logs` the daily logs and counters survive; otherwise the
    /// challenge restarts at day 1.
    pub fn set(&self, texts: &[String], keep_logs: bool, today: &str) -> RulesOutput {
        let state = match load_required(&self.store) {
            Ok(state) => state,
            Err(err) => return RulesOutput::failure(err.to_string()),
        };

        let new_rules = rules_from_texts(texts);
        let result = if keep_logs {
            update_rules_without_reset(&state, new_rules)
        } else {
            update_rules(&state, new_rules, today)
        };

        let next = match result {
            Ok(next) => next,
            Err(err) => return RulesOutput::failure(err.to_string()),
        };

        if let Err(err) = self.store.save(&next) {
            return RulesOutput::failure(err.to_string());
        }

        RulesOutput {
            success: true,
            rules: next.rules,
            reset: !keep_logs,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RulesOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if !output.success {
                return format!(
                    "Rules command failed: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }

            let mut out = String::new();
            if output.reset {
                out.push_str("Rules replaced; challenge restarted at Day 1.\n\n");
            }
            for (index, rule) in output.rules.iter().enumerate() {
                out.push_str(&format!("  {:02}  {}\n", index + 1, rule.text));
            }
            out
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{default_rules, initialize, toggle_task};
    use crate::storage::MemoryChallengeStore;
    use std::sync::Arc;

    const TODAY: &str = "2026-06-10";

    fn setup() -> (Arc<MemoryChallengeStore>, RulesCommand<Arc<MemoryChallengeStore>>) {
        let store = Arc::new(MemoryChallengeStore::new());
        let mut state = initialize(default_rules(), "2026-06-01").unwrap();
        state = toggle_task(&state, 1, TODAY).unwrap();
        store.save(&state).unwrap();
        let command = RulesCommand::new(store.clone());
        (store, command)
    }

    fn texts(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("rule {i}")).collect()
    }

    #[test]
    fn test_list() {
        let (_store, command) = setup();

        let output = command.list();
        assert!(output.success);
        assert_eq!(output.rules.len(), 6);
    }

    #[test]
    fn test_set_with_reset() {
        let (store, command) = setup();

        let output = command.set(&texts(3), false, TODAY);
        assert!(output.success);
        assert!(output.reset);

        let state = store.load().unwrap().unwrap();
        assert_eq!(state.rules.len(), 3);
        assert!(state.daily_logs.is_empty());
        assert_eq!(state.challenge.total_resets, 1);
        assert_eq!(state.challenge.start_date.as_deref(), Some(TODAY));
    }

    #[test]
    fn test_set_keeping_logs() {
        let (store, command) = setup();

        let output = command.set(&texts(4), true, TODAY);
        assert!(output.success);
        assert!(!output.reset);

        let state = store.load().unwrap().unwrap();
        assert_eq!(state.rules.len(), 4);
        assert!(!state.daily_logs.is_empty());
        assert_eq!(state.challenge.total_resets, 0);
    }

    #[test]
    fn test_set_validates_count() {
        let (_store, command) = setup();

        let output = command.set(&texts(2), false, TODAY);
        assert!(!output.success);

        let output = command.set(&texts(9), true, TODAY);
        assert!(!output.success);
    }

    #[test]
    fn test_without_challenge() {
        let store = Arc::new(MemoryChallengeStore::new());
        let command = RulesCommand::new(store);

        assert!(!command.list().success);
        assert!(!command.set(&texts(3), false, TODAY).success);
    }

    #[test]
    fn test_format_output() {
        let (_store, command) = setup();
        let output = command.set(&texts(3), false, TODAY);

        let text = command.format_output(&output, &OutputOptions::default());
        assert!(text.contains("restarted at Day 1"));
        assert!(text.contains("rule 3"));
    }
}
