// Safescan — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: run, status, reset, show-config.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::report::OutputFormat;

pub use commands::execute;

/// Safescan — Report on accounts waiting in a vault's pending safe.
#[derive(Parser, Debug)]
#[command(name = "safescan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (default: the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the pending-accounts report, resuming from a checkpoint if one exists.
    Run {
        /// Report file to write (overrides `output_path`).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Checkpoint file (overrides `checkpoint_path`).
        #[arg(long)]
        checkpoint: Option<PathBuf>,

        /// Report format (overrides `output_format`).
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show whether an interrupted run is waiting to be resumed.
    Status {
        /// Checkpoint file (overrides `checkpoint_path`).
        #[arg(long)]
        checkpoint: Option<PathBuf>,
    },

    /// Discard the checkpoint so the next run enumerates the safe again.
    Reset {
        /// Checkpoint file (overrides `checkpoint_path`).
        #[arg(long)]
        checkpoint: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML.
    ShowConfig,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::parse_from([
            "safescan",
            "--config",
            "/etc/safescan.toml",
            "run",
            "--output",
            "/tmp/out.json",
            "--format",
            "json",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/etc/safescan.toml")));
        match cli.command {
            Commands::Run { output, checkpoint, format } => {
                assert_eq!(output, Some(PathBuf::from("/tmp/out.json")));
                assert!(checkpoint.is_none());
                assert_eq!(format, Some(OutputFormat::Json));
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::parse_from(["safescan", "status", "--config", "c.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(cli.command, Commands::Status { .. }));
    }
}
