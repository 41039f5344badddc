//! Reset command: restart the challenge at day 1.
//!
//! Used both for a manual fresh start and to acknowledge an automatic
//! two-missed-days reset surfaced by `status`.

use serde::Serialize;

use crate::cli::{load_required, render, OutputOptions};
use crate::core::reset_challenge;
use crate::storage::ChallengeStore;

/// Output format for the reset command.
#[derive(Debug, Clone, Serialize)]
pub struct ResetOutput {
    /// Whether the reset was applied.
    pub success: bool,
    /// New start date (today).
    pub start_date: String,
    /// Lifetime reset count after this reset.
    pub total_resets: u32,
    /// Longest streak, preserved across the reset.
    pub longest_streak: u32,
    /// Error message if the reset failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResetOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            start_date: String::new(),
            total_resets: 0,
            longest_streak: 0,
            error: Some(error.into()),
        }
    }
}

/// The reset command implementation.
pub struct ResetCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> ResetCommand<S> {
    /// Create a new reset command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the reset command.
    pub fn run(&self, today: &str) -> ResetOutput {
        let state = match load_required(&self.store) {
            Ok(state) => state,
            Err(err) => return ResetOutput::failure(err.to_string()),
        };

        let next = reset_challenge(&state, today);
        if let Err(err) = self.store.save(&next) {
            return ResetOutput::failure(err.to_string());
        }

        ResetOutput {
            success: true,
            start_date: today.to_string(),
            total_resets: next.challenge.total_resets,
            longest_streak: next.challenge.longest_streak,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ResetOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if output.success {
                format!(
                    "Challenge reset. Day 1 is {}. Total resets: {}. Longest streak kept: {}.\n",
                    output.start_date, output.total_resets, output.longest_streak
                )
            } else {
                format!(
                    "Reset failed: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        })
    }
}
