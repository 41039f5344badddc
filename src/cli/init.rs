//! Init command: start a fresh challenge.

use serde::Serialize;

use crate::cli::{render, rules_from_texts, OutputOptions};
use crate::core::{default_rules, initialize};
use crate::error::FailOpen;
use crate::storage::ChallengeStore;

/// Options for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Rule texts, in order. Empty means use the stock rules.
    pub rules: Vec<String>,
    /// Start date (day key). Defaults to today.
    pub start_date: Option<String>,
    /// Replace an existing challenge.
    pub force: bool,
}

/// Output format for the init command.
#[derive(Debug, Clone, Serialize)]
pub struct InitOutput {
    /// Whether the challenge was created.
    pub success: bool,
    /// Start date of the new challenge.
    pub start_date: String,
    /// Number of rules installed.
    pub rule_count: usize,
    /// Error message if init failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InitOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            start_date: String::new(),
            rule_count: 0,
            error: Some(error.into()),
        }
    }
}

/// The init command implementation.
pub struct InitCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> InitCommand<S> {
    /// Create a new init command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the init command.
    pub fn run(&self, today: &str, options: &InitOptions) -> InitOutput {
        let exists = self.store.exists().fail_open_default("checking for record");
        if exists && !options.force {
            return InitOutput::failure(
                "a challenge already exists; pass --force to replace it",
            );
        }

        let rules = if options.rules.is_empty() {
            default_rules()
        } else {
            rules_from_texts(&options.rules)
        };
        let start_date = options.start_date.as_deref().unwrap_or(today);

        let state = match initialize(rules, start_date) {
            Ok(state) => state,
            Err(err) => return InitOutput::failure(err.to_string()),
        };

        if let Err(err) = self.store.save(&state) {
            return InitOutput::failure(err.to_string());
        }

        InitOutput {
            success: true,
            start_date: start_date.to_string(),
            rule_count: state.rules.len(),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &InitOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if output.success {
                format!(
                    "Challenge started on {} with {} rules.\nDay 1 begins. Good luck.\n",
                    output.start_date, output.rule_count
                )
            } else {
                format!(
                    "Init failed: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryChallengeStore;
    use std::sync::Arc;

    const TODAY: &str = "2026-06-10";

    fn setup() -> (Arc<MemoryChallengeStore>, InitCommand<Arc<MemoryChallengeStore>>) {
        let store = Arc::new(MemoryChallengeStore::new());
        let command = InitCommand::new(store.clone());
        (store, command)
    }

    #[test]
    fn test_init_with_defaults() {
        let (store, command) = setup();

        let output = command.run(TODAY, &InitOptions::default());
        assert!(output.success);
        assert_eq!(output.start_date, TODAY);
        assert_eq!(output.rule_count, 6);

        let state = store.load().unwrap().unwrap();
        assert_eq!(state.challenge.start_date.as_deref(), Some(TODAY));
    }

    #[test]
    fn test_init_with_custom_rules_and_date() {
        let (store, command) = setup();

        let options = InitOptions {
            rules: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            start_date: Some("2026-06-01".to_string()),
            ..Default::default()
        };
        let output = command.run(TODAY, &options);
        assert!(output.success);
        assert_eq!(output.rule_count, 4);

        let state = store.load().unwrap().unwrap();
        assert_eq!(state.challenge.start_date.as_deref(), Some("2026-06-01"));
        assert_eq!(state.rules[3].id, 4);
    }

    #[test]
    fn test_init_refuses_existing_challenge() {
        let (_store, command) = setup();

        assert!(command.run(TODAY, &InitOptions::default()).success);
        let second = command.run(TODAY, &InitOptions::default());
        assert!(!second.success);
        assert!(second.error.unwrap().contains("--force"));
    }

    #[test]
    fn test_init_force_replaces() {
        let (store, command) = setup();

        assert!(command.run(TODAY, &InitOptions::default()).success);
        let options = InitOptions {
            rules: vec!["x".into(), "y".into(), "z".into()],
            force: true,
            ..Default::default()
        };
        assert!(command.run(TODAY, &options).success);

        let state = store.load().unwrap().unwrap();
        assert_eq!(state.rules.len(), 3);
    }

    #[test]
    fn test_init_rejects_bad_rule_count() {
        let (_store, command) = setup();

        let options = InitOptions {
            rules: vec!["only one".into()],
            ..Default::default()
        };
        let output = command.run(TODAY, &options);
        assert!(!output.success);
        assert!(output.error.unwrap().contains("between 3 and 8"));
    }

    #[test]
    fn test_format_output_human() {
        let (_store, command) = setup();
        let output = command.run(TODAY, &InitOptions::default());

        let text = command.format_output(&output, &OutputOptions::default());
        assert!(text.contains("Challenge started"));
    }

    #[test]
    fn test_format_output_json() {
        let (_store, command) = setup();
        let output = command.run(TODAY, &InitOptions::default());

        let json = command.format_output(
            &output,
            &OutputOptions {
                json: true,
                quiet: false,
            },
        );
        assert!(json.contains("\"success\": true"));
    }
}
