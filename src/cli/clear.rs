//! Clear command: destroy the challenge record entirely.

use serde::Serialize;

use crate::cli::{render, OutputOptions};
use crate::storage::ChallengeStore;

/// Output format for the clear command.
#[derive(Debug, Clone, Serialize)]
pub struct ClearOutput {
    /// Whether the record was destroyed.
    pub success: bool,
    /// Error message if the clear was refused or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The clear command implementation.
pub struct ClearCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> ClearCommand<S> {
    /// Create a new clear command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the clear command.
    ///
    /// Refuses unless `confirmed`: destroying the aggregate cannot be
    /// undone from inside the app.
    pub fn run(&self, confirmed: bool) -> ClearOutput {
        if !confirmed {
            return ClearOutput {
                success: false,
                error: Some("clearing deletes everything; pass --yes to confirm".to_string()),
            };
        }

        match self.store.clear() {
            Ok(()) => ClearOutput {
                success: true,
                error: None,
            },
            Err(err) => ClearOutput {
                success: false,
                error: Some(err.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ClearOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if output.success {
                "All data cleared. Run `smart75 init` to start over.\n".to_string()
            } else {
                format!(
                    "Clear refused: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        })
    }
}
