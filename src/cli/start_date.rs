//! Start-date command: move the challenge start date.
//!
//! Day indexes are derived from the start date, so the logs tied to the
//! old range are discarded along with the move.

use serde::Serialize;

use crate::cli::{load_required, render, OutputOptions};
use crate::core::{current_day, update_start_date, CHALLENGE_DAYS};
use crate::storage::ChallengeStore;

/// Output format for the start-date command.
#[derive(Debug, Clone, Serialize)]
pub struct StartDateOutput {
    /// Whether the change was applied.
    pub success: bool,
    /// The new start date.
    pub start_date: String,
    /// Current day under the new start date, capped for display.
    pub current_day: i64,
    /// Error message if the change failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StartDateOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            start_date: String::new(),
            current_day: 0,
            error: Some(error.into()),
        }
    }
}

/// The start-date command implementation.
pub struct StartDateCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> StartDateCommand<S> {
    /// Create a new start-date command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the start-date command.
    pub fn run(&self, new_date: &str, today: &str) -> StartDateOutput {
        let state = match load_required(&self.store) {
            Ok(state) => state,
            Err(err) => return StartDateOutput::failure(err.to_string()),
        };

        let next = match update_start_date(&state, new_date) {
            Ok(next) => next,
            Err(err) => return StartDateOutput::failure(err.to_string()),
        };

        if let Err(err) = self.store.save(&next) {
            return StartDateOutput::failure(err.to_string());
        }

        StartDateOutput {
            success: true,
            start_date: new_date.to_string(),
            current_day: current_day(&next, today).min(CHALLENGE_DAYS),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StartDateOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if output.success {
                format!(
                    "Start date moved to {}. You are now on day {}.\n",
                    output.start_date, output.current_day
                )
            } else {
                format!(
                    "Start-date change failed: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        })
    }
}
