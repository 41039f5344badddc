//! Stats command: challenge overview and per-rule breakdown.

use serde::Serialize;

use crate::cli::{load_required, render, OutputOptions};
use crate::stats::{compute, ChallengeStats};
use crate::storage::ChallengeStore;

/// Output format for the stats command.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    /// Whether stats were computed.
    pub success: bool,
    /// The statistics rollup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ChallengeStats>,
    /// Error message if stats failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The stats command implementation.
pub struct StatsCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> StatsCommand<S> {
    /// Create a new stats command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the stats command.
    pub fn run(&self, today: &str) -> StatsOutput {
        match load_required(&self.store) {
            Ok(state) => StatsOutput {
                success: true,
                stats: Some(compute(&state, today)),
                error: None,
            },
            Err(err) => StatsOutput {
                success: false,
                stats: None,
                error: Some(err.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatsOutput, options: &OutputOptions) -> String {
        render(output, options, || Self::format_human(output))
    }

    fn format_human(output: &StatsOutput) -> String {
        let Some(stats) = &output.stats else {
            return format!(
                "Stats failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        };

        let mut out = String::new();
        out.push_str(&format!("Current day      {} / 75\n", stats.current_day));
        out.push_str(&format!("Current streak   {}\n", stats.current_streak));
        out.push_str(&format!("Longest streak   {}\n", stats.longest_streak));
        out.push_str(&format!("Total resets     {}\n", stats.total_resets));
        if stats.total_completions > 0 {
            out.push_str(&format!("Completions      {}\n", stats.total_completions));
        }
        out.push_str(&format!(
            "Completion rate  {}%  ({} complete of {} logged)\n",
            stats.completion_rate, stats.complete_days, stats.days_logged
        ));

        out.push_str("\nTask breakdown\n");
        for (index, rule) in stats.rules.iter().enumerate() {
            out.push_str(&format!(
                "  {:02}  {:>3}%  {}\n",
                index + 1,
                rule.percentage,
                rule.text
            ));
        }

        out
    }
}
