//! Export command: write the downloadable backup artifact.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{load_required, render, OutputOptions};
use crate::error::Smart75Error;
use crate::stats::{export_file_name, ExportDocument};
use crate::storage::ChallengeStore;

/// Output format for the export command.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutput {
    /// Whether the export was written.
    pub success: bool,
    /// Path of the written backup file.
    pub path: String,
    /// Error message if the export failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            path: String::new(),
            error: Some(error.into()),
        }
    }
}

/// The export command implementation.
pub struct ExportCommand<S: ChallengeStore> {
    store: S,
}

impl<S: ChallengeStore> ExportCommand<S> {
    /// Create a new export command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the export command.
    ///
    /// Writes to `out` when given, else `smart75-backup-<today>.json` in
    /// the current directory.
    pub fn run(&self, out: Option<PathBuf>, today: &str) -> ExportOutput {
        let state = match load_required(&self.store) {
            Ok(state) => state,
            Err(err) => return ExportOutput::failure(err.to_string()),
        };

        let document = ExportDocument::new(&state);
        let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(today)));

        let json = match serde_json::to_string_pretty(&document) {
            Ok(json) => json,
            Err(err) => return ExportOutput::failure(err.to_string()),
        };
        if let Err(err) = fs::write(&path, json) {
            return ExportOutput::failure(Smart75Error::storage(&path, err).to_string());
        }

        ExportOutput {
            success: true,
            path: path.display().to_string(),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ExportOutput, options: &OutputOptions) -> String {
        render(output, options, || {
            if output.success {
                format!("Backup written to {}.\n", output.path)
            } else {
                format!(
                    "Export failed: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        })
    }
}
