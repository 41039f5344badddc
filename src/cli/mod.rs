//! CLI commands for smart75.
//!
//! Each command is a struct generic over the storage backend, with an
//! `Options` struct (json/quiet), a serializable `Output`, and a
//! `format_output` helper. Commands never read the clock themselves: the
//! entry point derives "today" once and threads it through.

pub mod clear;
pub mod export;
pub mod init;
pub mod log;
pub mod migrate;
pub mod reflect;
pub mod reset;
pub mod rules;
pub mod start_date;
pub mod stats_cmd;
pub mod status;
pub mod toggle;
pub mod victory;

pub use clear::ClearCommand;
pub use export::ExportCommand;
pub use init::InitCommand;
pub use log::LogCommand;
pub use migrate::MigrateCommand;
pub use reflect::ReflectCommand;
pub use reset::ResetCommand;
pub use rules::RulesCommand;
pub use start_date::StartDateCommand;
pub use stats_cmd::StatsCommand;
pub use status::StatusCommand;
pub use toggle::ToggleCommand;
pub use victory::VictoryCommand;

use crate::core::{ChallengeState, Rule};
use crate::error::{Result, Smart75Error};
use crate::storage::ChallengeStore;

/// Common output options shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Load the challenge record, erroring when none exists.
pub(crate) fn load_required<S: ChallengeStore>(store: &S) -> Result<ChallengeState> {
    store.load()?.ok_or_else(|| {
        Smart75Error::validation("no active challenge; run `smart75 init` to start one")
    })
}

/// Build a rule set from ordered texts, assigning ids 1..=n.
pub(crate) fn rules_from_texts(texts: &[String]) -> Vec<Rule> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Rule::new(i as u32 + 1, text.clone()))
        .collect()
}

/// Render an output value according to the options.
pub(crate) fn render<T: serde::Serialize>(
    output: &T,
    options: &OutputOptions,
    human: impl FnOnce() -> String,
) -> String {
    if options.quiet {
        return String::new();
    }
    if options.json {
        serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
    } else {
        human()
    }
}
