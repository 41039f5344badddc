//! Log command: calendar-style view of challenge days.
//!
//! Lists one month of days with their completion status, or shows the
//! detail of a single day: per-rule marks and the reflection. Only today
//! is ever undecided; past days without a full log read as missed.

use serde::Serialize;

use crate::cli::{load_required, render, OutputOptions};
use crate::core::{day_offset, day_status, is_valid_day_key, ChallengeState, DayStatus};
use crate::storage::ChallengeStore;

/// One day line in the month listing.
#[derive(Debug, Clone, Serialize)]
pub struct DayLine {
    /// Day key.
    pub day: String,
    /// Status label: outside, future, today, complete, incomplete.
    pub status: String,
}

/// Per-rule mark in a day detail.
#[derive(Debug, Clone, Serialize)]
pub struct DayDetailRule {
    /// Rule identifier.
    pub id: u32,
    /// Rule text.
    pub text: String,
    /// Whether it was completed that day.
    pub completed: bool,
}

/// Detail view of a single day.
#[derive(Debug, Clone, Serialize)]
pub struct DayDetail {
    /// Day key.
    pub day: String,
    /// Status label.
    pub status: String,
    /// Whether any activity was recorded.
    pub logged: bool,
    /// Per-rule marks against the current rule set.
    pub rules: Vec<DayDetailRule>,
    /// The day's reflection, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
}

/// Output format for the log command.
#[derive(Debug, Clone, Serialize)]
pub struct LogOutput {
    /// Whether the command succeeded.
    pub success: bool,
    /// Month being listed (`YYYY-MM`), for the listing form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// Day lines, for the listing form.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<DayLine>,
    /// Day detail, for the detail form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DayDetail>,
    /// Error message if the command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            month: None,
            days: Vec::new(),
            detail: None,
            error: Some(error.into()),
        }
    }
}

fn status_label(status: DayStatus) -> &'static str {
    match status {
        DayStatus::Outside => "outside",
        DayStatus::Future => "future",
        DayStatus::Today => "today",
        DayStatus::Complete => "complete",
        DayStatus::Incomplete => "incomplete",
    }
}

fn status_symbol(label: &str) -> &'static str {
    match label {
        "future" => "o",
        "today" => ">",
        "complete" => "+",
        "incomplete" => "x",
        _ => " ",
    }
}

/// The log command implementation.
pub struct LogCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> LogCommand<S> {
    /// Create a new log command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// List the days of a month. `month` is `YYYY-MM`, defaulting to
    /// today's month.
    pub fn run_month(&self, month: Option<&str>, today: &str) -> LogOutput {
        let state = match load_required(&self.store) {
            Ok(state) => state,
            Err(err) => return LogOutput::failure(err.to_string()),
        };

        let month = month
            .map(str::to_string)
            .unwrap_or_else(|| today[..7].to_string());
        let first = format!("{month}-01");
        if !is_valid_day_key(&first) {
            return LogOutput::failure(format!("invalid month: {month}"));
        }

        let mut days = Vec::new();
        let mut day = first;
        while day.starts_with(&month) {
            days.push(DayLine {
                status: status_label(day_status(&state, &day, today)).to_string(),
                day: day.clone(),
            });
            match day_offset(&day, 1) {
                Some(next) => day = next,
                None => break,
            }
        }

        LogOutput {
            success: true,
            month: Some(month),
            days,
            detail: None,
            error: None,
        }
    }

    /// Show the detail of a single day.
    pub fn run_day(&self, day_key: &str, today: &str) -> LogOutput {
        let state = match load_required(&self.store) {
            Ok(state) => state,
            Err(err) => return LogOutput::failure(err.to_string()),
        };

        if !is_valid_day_key(day_key) {
            return LogOutput::failure(format!("invalid day: {day_key}"));
        }

        LogOutput {
            success: true,
            month: None,
            days: Vec::new(),
            detail: Some(Self::detail(&state, day_key, today)),
            error: None,
        }
    }

    fn detail(state: &ChallengeState, day_key: &str, today: &str) -> DayDetail {
        let log = state.log_for(day_key);
        DayDetail {
            day: day_key.to_string(),
            status: status_label(day_status(state, day_key, today)).to_string(),
            logged: log.is_some(),
            rules: state
                .rules
                .iter()
                .map(|rule| DayDetailRule {
                    id: rule.id,
                    text: rule.text.clone(),
                    completed: log.map(|l| l.is_completed(rule.id)).unwrap_or(false),
                })
                .collect(),
            reflection: log
                .filter(|l| !l.reflection.is_empty())
                .map(|l| l.reflection.clone()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &LogOutput, options: &OutputOptions) -> String {
        render(output, options, || Self::format_human(output))
    }

    fn format_human(output: &LogOutput) -> String {
        if !output.success {
            return format!(
                "Log failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if let Some(detail) = &output.detail {
            let mut out = format!("{}  ({})\n", detail.day, detail.status);
            if detail.logged || detail.status == "today" {
                for rule in &detail.rules {
                    out.push_str(&format!(
                        "  [{}] {}\n",
                        if rule.completed { "x" } else { " " },
                        rule.text
                    ));
                }
                if let Some(reflection) = &detail.reflection {
                    out.push_str(&format!("\n  {reflection}\n"));
                }
            } else {
                out.push_str("  No activity recorded.\n");
            }
            return out;
        }

        let mut out = format!("{}\n", output.month.as_deref().unwrap_or(""));
        for line in &output.days {
            out.push_str(&format!("  {} {}\n", status_symbol(&line.status), line.day));
        }
        out.push_str("\n  + complete   x incomplete   > today   o future\n");
        out
    }
}
