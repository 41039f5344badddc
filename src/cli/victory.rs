//! Victory command: acknowledge a completed 75-day cycle.

use serde::Serialize;

use crate::cli::{load_required, render, OutputOptions};
use crate::core::{acknowledge_victory, check_for_victory};
use crate::storage::ChallengeStore;

/// Output format for the victory command.
#[derive(Debug, Clone, Serialize)]
pub struct VictoryOutput {
    /// Whether the victory was acknowledged.
    pub success: bool,
    /// Lifetime count of full completions.
    pub total_completions: u32,
    /// Error message if there was nothing to acknowledge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VictoryOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            total_completions: 0,
            error: Some(error.into()),
        }
    }
}

/// The victory command implementation.
pub struct VictoryCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> VictoryCommand<S> {
    /// Create a new victory command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the victory command.
    pub fn run(&self, today: &str) -> VictoryOutput {
        let state = match load_required(&self.store) {
            Ok(state) => state,
            Err(err) => return VictoryOutput::failure(err.to_string()),
        };

        if !check_for_victory(&state, today) {
            return VictoryOutput::failure(if state.challenge.victory_shown {
                "this victory has already been celebrated"
            } else {
                "day 75 has not been reached yet"
            });
        }

        let next = acknowledge_victory(&state);
        if let Err(err) = self.store.save(&next) {
            return VictoryOutput::failure(err.to_string());
        }

        VictoryOutput {
            success: true,
            total_completions: next.challenge.total_completions,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &VictoryOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if output.success {
                format!(
                    "75 days. Done. That makes {} full completion{}.\n",
                    output.total_completions,
                    if output.total_completions == 1 { "" } else { "s" }
                )
            } else {
                format!(
                    "Nothing to celebrate: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        })
    }
}
