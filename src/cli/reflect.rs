//! Reflect command: record today's free-text reflection.

use serde::Serialize;

use crate::cli::{load_required, render, OutputOptions};
use crate::core::set_reflection;
use crate::storage::ChallengeStore;

/// Output format for the reflect command.
#[derive(Debug, Clone, Serialize)]
pub struct ReflectOutput {
    /// Whether the reflection was saved.
    pub success: bool,
    /// The saved reflection text.
    pub reflection: String,
    /// Error message if saving failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReflectOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            reflection: String::new(),
            error: Some(error.into()),
        }
    }
}

/// The reflect command implementation.
pub struct ReflectCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> ReflectCommand<S> {
    /// Create a new reflect command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the reflect command.
    pub fn run(&self, text: &str, today: &str) -> ReflectOutput {
        let state = match load_required(&self.store) {
            Ok(state) => state,
            Err(err) => return ReflectOutput::failure(err.to_string()),
        };

        let next = set_reflection(&state, text, today);
        if let Err(err) = self.store.save(&next) {
            return ReflectOutput::failure(err.to_string());
        }

        ReflectOutput {
            success: true,
            reflection: text.to_string(),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ReflectOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if output.success {
                "Reflection saved.\n".to_string()
            } else {
                format!(
                    "Reflect failed: {}\n",
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

    fn setup() -> (Arc<MemoryChallengeStore>, ReflectCommand<Arc<MemoryChallengeStore>>) {
        let store = Arc::new(MemoryChallengeStore::new());
        store
            .save(&initialize(default_rules(), TODAY).unwrap())
            .unwrap();
        let command = ReflectCommand::new(store.clone());
        (store, command)
    }

    #[test]
    fn test_reflect_saves_text() {
        let (store, command) = setup();

        let output = command.run("hard but good day", TODAY);
        assert!(output.success);

        let state = store.load().unwrap().unwrap();
        assert_eq!(state.log_for(TODAY).unwrap().reflection, "hard but good day");
    }

    #[test]
    fn test_reflect_replaces_previous_text() {
        let (store, command) = setup();

        command.run("v1", TODAY);
        command.run("v2", TODAY);

        let state = store.load().unwrap().unwrap();
        assert_eq!(state.log_for(TODAY).unwrap().reflection, "v2");
    }

    #[test]
    fn test_reflect_without_challenge() {
        let store = Arc::new(MemoryChallengeStore::new());
        let command = ReflectCommand::new(store);

        let output = command.run("text", TODAY);
        assert!(!output.success);
    }

    #[test]
    fn test_format_output() {
        let (_store, command) = setup();
        let output = command.run("note", TODAY);

        let text = command.format_output(&output, &OutputOptions::default());
        assert_eq!(text, "Reflection saved.\n");
    }
}
