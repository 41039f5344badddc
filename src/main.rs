//! smart75 - 75-day commitment challenge tracker
//!
//! CLI entry point. The storage capability probe runs once here, before
//! any command; "today" is derived once and threaded into every command so
//! the engine itself never touches the clock.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use smart75::cli::{
    init::InitOptions, ClearCommand, ExportCommand, InitCommand, LogCommand, MigrateCommand,
    OutputOptions, ReflectCommand, ResetCommand, RulesCommand, StartDateCommand, StatsCommand,
    StatusCommand, ToggleCommand, VictoryCommand,
};
use smart75::config::Config;
use smart75::core::today_key;
use smart75::error::exit_codes;
use smart75::storage::{
    ChallengeStore, DirRemoteStore, FileChallengeStore, TieredStore,
};

/// smart75 - 75-day commitment challenge tracker
#[derive(Parser)]
#[command(name = "smart75")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a fresh 75-day challenge
    Init {
        /// A rule text; repeat for each rule (3-8). Omit to use the stock rules
        #[arg(long = "rule")]
        rules: Vec<String>,
        /// Start date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start_date: Option<String>,
        /// Replace an existing challenge
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show today's checklist, streak, and any warnings
    Status {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Toggle a rule's completion for today
    Toggle {
        /// The rule id to toggle
        rule_id: u32,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Record today's reflection
    Reflect {
        /// The reflection text
        text: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show challenge statistics
    Stats {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show a month of challenge days, or one day in detail
    Log {
        /// Month to list (YYYY-MM), defaults to the current month
        #[arg(long)]
        month: Option<String>,
        /// Show a single day (YYYY-MM-DD) in detail
        #[arg(long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List or replace the rule set
    Rules {
        /// New rule texts; repeat for each rule. Omit to list current rules
        #[arg(long = "rule")]
        rules: Vec<String>,
        /// Keep daily logs and counters when replacing rules
        #[arg(long)]
        keep_logs: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Restart the challenge at day 1
    Reset {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Move the challenge start date (discards daily logs)
    SetStart {
        /// The new start date (YYYY-MM-DD)
        date: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Acknowledge a completed 75-day cycle
    Victory {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Export a backup of the challenge record
    Export {
        /// Output file path, defaults to smart75-backup-<date>.json
        #[arg(long, short)]
        out: Option<PathBuf>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Delete all challenge data
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Copy the local record to remote storage (one-time)
    Migrate {
        /// Replace an existing remote record
        #[arg(long)]
        overwrite: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::load_fail_open();
    let today = today_key();

    let local = match FileChallengeStore::new(&config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Fatal: {err}");
            return code(exit_codes::STORAGE_UNAVAILABLE);
        }
    };

    // Capability probe, once, before anything else. Without working
    // storage no transition may be attempted.
    if !local.is_available() {
        eprintln!(
            "Fatal: storage is unavailable at {}. smart75 cannot run without a writable record.",
            local.path().display()
        );
        return code(exit_codes::STORAGE_UNAVAILABLE);
    }

    // Migrate works on the concrete tiered store; everything else goes
    // through the ChallengeStore seam.
    if let Commands::Migrate {
        overwrite,
        json,
        quiet,
    } = &cli.command
    {
        let options = OutputOptions {
            json: *json,
            quiet: *quiet,
        };
        return run_migrate(&config, local, *overwrite, &options);
    }

    let store = build_store(&config, local);

    let (rendered, success) = match cli.command {
        Commands::Init {
            rules,
            start_date,
            force,
            json,
            quiet,
        } => {
            let output_options = OutputOptions { json, quiet };
            let options = InitOptions {
                rules,
                start_date,
                force,
            };
            let command = InitCommand::new(store);
            let output = command.run(&today, &options);
            (command.format_output(&output, &output_options), output.success)
        }
        Commands::Status { json, quiet } => {
            let options = OutputOptions { json, quiet };
            let command = StatusCommand::new(store);
            let output = command.run(&today);
            (command.format_output(&output, &options), true)
        }
        Commands::Toggle {
            rule_id,
            json,
            quiet,
        } => {
            let options = OutputOptions { json, quiet };
            let command = ToggleCommand::new(store);
            let output = command.run(rule_id, &today);
            (command.format_output(&output, &options), output.success)
        }
        Commands::Reflect { text, json, quiet } => {
            let options = OutputOptions { json, quiet };
            let command = ReflectCommand::new(store);
            let output = command.run(&text, &today);
            (command.format_output(&output, &options), output.success)
        }
        Commands::Stats { json, quiet } => {
            let options = OutputOptions { json, quiet };
            let command = StatsCommand::new(store);
            let output = command.run(&today);
            (command.format_output(&output, &options), output.success)
        }
        Commands::Log {
            month,
            day,
            json,
            quiet,
        } => {
            let options = OutputOptions { json, quiet };
            let command = LogCommand::new(store);
            let output = match day {
                Some(day) => command.run_day(&day, &today),
                None => command.run_month(month.as_deref(), &today),
            };
            (command.format_output(&output, &options), output.success)
        }
        Commands::Rules {
            rules,
            keep_logs,
            json,
            quiet,
        } => {
            let options = OutputOptions { json, quiet };
            let command = RulesCommand::new(store);
            let output = if rules.is_empty() {
                command.list()
            } else {
                command.set(&rules, keep_logs, &today)
            };
            (command.format_output(&output, &options), output.success)
        }
        Commands::Reset { json, quiet } => {
            let options = OutputOptions { json, quiet };
            let command = ResetCommand::new(store);
            let output = command.run(&today);
            (command.format_output(&output, &options), output.success)
        }
        Commands::SetStart { date, json, quiet } => {
            let options = OutputOptions { json, quiet };
            let command = StartDateCommand::new(store);
            let output = command.run(&date, &today);
            (command.format_output(&output, &options), output.success)
        }
        Commands::Victory { json, quiet } => {
            let options = OutputOptions { json, quiet };
            let command = VictoryCommand::new(store);
            let output = command.run(&today);
            (command.format_output(&output, &options), output.success)
        }
        Commands::Export { out, json, quiet } => {
            let options = OutputOptions { json, quiet };
            let command = ExportCommand::new(store);
            let output = command.run(out, &today);
            (command.format_output(&output, &options), output.success)
        }
        Commands::Clear { yes, json, quiet } => {
            let options = OutputOptions { json, quiet };
            let command = ClearCommand::new(store);
            let output = command.run(yes);
            (command.format_output(&output, &options), output.success)
        }
        Commands::Migrate { .. } => unreachable!("handled above"),
    };

    print!("{rendered}");
    if success {
        code(exit_codes::SUCCESS)
    } else {
        code(exit_codes::FAILURE)
    }
}

/// Build the storage stack: the local file store, wrapped in the tiered
/// local+remote store when a remote is fully configured. A broken remote
/// configuration degrades to local-only with a warning.
fn build_store(config: &Config, local: FileChallengeStore) -> Arc<dyn ChallengeStore> {
    if let Some((dir, user_id)) = remote_settings(config) {
        match DirRemoteStore::new(dir) {
            Ok(remote) => {
                return Arc::new(TieredStore::new(local, remote, user_id));
            }
            Err(err) => {
                eprintln!("Warning: remote storage unavailable ({err}); running local-only.");
            }
        }
    }
    Arc::new(local)
}

/// Remote directory and user id, when the remote is fully configured.
fn remote_settings(config: &Config) -> Option<(PathBuf, String)> {
    if !config.remote.enabled {
        return None;
    }
    match (config.remote.dir.clone(), config.remote.user_id.clone()) {
        (Some(dir), Some(user_id)) => Some((dir, user_id)),
        _ => None,
    }
}

fn run_migrate(
    config: &Config,
    local: FileChallengeStore,
    overwrite: bool,
    options: &OutputOptions,
) -> ExitCode {
    let Some((dir, user_id)) = remote_settings(config) else {
        eprintln!(
            "Migrate needs a remote: set remote.enabled, remote.dir, and remote.user_id in config.toml."
        );
        return code(exit_codes::FAILURE);
    };

    let remote = match DirRemoteStore::new(dir) {
        Ok(remote) => remote,
        Err(err) => {
            eprintln!("Migrate failed: {err}");
            return code(exit_codes::FAILURE);
        }
    };

    let command = MigrateCommand::new(TieredStore::new(local, remote, user_id));
    let output = command.run(overwrite);
    print!("{}", command.format_output(&output, options));
    if output.success {
        code(exit_codes::SUCCESS)
    } else {
        code(exit_codes::FAILURE)
    }
}

fn code(value: i32) -> ExitCode {
    ExitCode::from(value as u8)
}
