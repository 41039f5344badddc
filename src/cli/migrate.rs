//! Migrate command: one-time copy of the local record to the remote.

use serde::Serialize;

use crate::cli::{render, OutputOptions};
use crate::error::Smart75Error;
use crate::storage::{ChallengeStore, RemoteStore, TieredStore};

/// Output format for the migrate command.
#[derive(Debug, Clone, Serialize)]
pub struct MigrateOutput {
    /// Whether the migration completed.
    pub success: bool,
    /// Whether the failure was an existing-remote-data conflict.
    pub conflict: bool,
    /// Error message if the migration failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The migrate command implementation.
pub struct MigrateCommand<L: ChallengeStore, R: RemoteStore> {
    tiered: TieredStore<L, R>,
}

impl<L: ChallengeStore, R: RemoteStore> MigrateCommand<L, R> {
    /// Create a new migrate command over a tiered store.
    pub fn new(tiered: TieredStore<L, R>) -> Self {
        Self { tiered }
    }

    /// Run the migration.
    ///
    /// Without `overwrite` an existing remote record is a conflict the
    /// user has to resolve explicitly; nothing is replaced silently.
    pub fn run(&self, overwrite: bool) -> MigrateOutput {
        match self.tiered.migrate(overwrite) {
            Ok(()) => MigrateOutput {
                success: true,
                conflict: false,
                error: None,
            },
            Err(err) => MigrateOutput {
                success: false,
                conflict: matches!(err, Smart75Error::RemoteConflict { .. }),
                error: Some(err.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &MigrateOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if output.success {
                "Local challenge copied to remote storage.\n".to_string()
            } else if output.conflict {
                format!(
                    "Migration refused: {}\nPass --overwrite to replace the remote record.\n",
                    output.error.as_deref().unwrap_or("remote data exists")
                )
            } else {
                format!(
                    "Migration failed: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        })
    }
}
