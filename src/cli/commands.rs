// Safescan — CLI Command Handlers
//
// Each function handles one CLI subcommand. They load the configuration,
// apply command-line overrides, and coordinate the vault backend, the
// checkpoint store, and the report pipeline.

use crate::config::Config;
use crate::error::SafescanError;
use crate::pipeline;
use crate::report::{file_reporter, CheckpointStore};
use crate::vault::PacliBackend;

use super::{Cli, Commands};

/// Execute the parsed CLI command.
pub fn execute(cli: Cli) -> Result<(), SafescanError> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            output,
            checkpoint,
            format,
        } => cmd_run(config.with_overrides(output, checkpoint, format)),
        Commands::Status { checkpoint } => cmd_status(config.with_overrides(None, checkpoint, None)),
        Commands::Reset { checkpoint } => cmd_reset(config.with_overrides(None, checkpoint, None)),
        Commands::ShowConfig => cmd_show_config(&config),
    }
}

// ─── Run ─────────────────────────────────────────────────────────────────────

fn cmd_run(config: Config) -> Result<(), SafescanError> {
    config.validate()?;

    let backend = PacliBackend::new(&config.pacli_path, config.session_id);
    let reporter = file_reporter(config.output_format, &config.output_path);

    match pipeline::run(&backend, &config, reporter.as_ref()) {
        Ok(summary) => {
            println!("✓ Pending accounts report written");
            println!("  Accounts: {}", summary.total);
            println!("  Enriched: {}", summary.enriched);
            println!("  Linked:   {}", summary.linked);
            if summary.resumed {
                println!("  Resumed from checkpoint");
            }
            println!("  Report:   {}", summary.destination);
            Ok(())
        }
        Err(e @ SafescanError::Enrichment { .. }) => {
            println!("✗ The run stopped before every account was processed.");
            println!("  Progress is saved in {}", config.checkpoint_path.display());
            println!("  Run `safescan run` again to resume.");
            if config.auto_change_password {
                println!("  Note: auto password change is on; the logon file has been rotated.");
            }
            Err(e)
        }
        Err(e) => Err(e),
    }
}

// ─── Status ──────────────────────────────────────────────────────────────────

fn cmd_status(config: Config) -> Result<(), SafescanError> {
    let store = CheckpointStore::new(&config.checkpoint_path);

    match store.status()? {
        Some(status) => {
            println!("Checkpoint found: {}", store.path().display());
            println!("  Pending:   {}", status.pending);
            println!("  Completed: {}", status.completed);
            println!();
            println!("Next: `safescan run` resumes, `safescan reset` discards it.");
        }
        None => {
            println!("No checkpoint at {}", store.path().display());
            println!("The next run will enumerate safe '{}'.", config.safe);
        }
    }

    Ok(())
}

// ─── Reset ───────────────────────────────────────────────────────────────────

fn cmd_reset(config: Config) -> Result<(), SafescanError> {
    let store = CheckpointStore::new(&config.checkpoint_path);
    let found = store.exists() || store.done_path().exists();

    // Also sweeps a completed file left without its work list.
    store.clear()?;

    if found {
        println!("✓ Checkpoint {} removed", store.path().display());
    } else {
        println!("No checkpoint at {}", store.path().display());
    }
    Ok(())
}

// ─── Show Config ─────────────────────────────────────────────────────────────

fn cmd_show_config(config: &Config) -> Result<(), SafescanError> {
    print!("{}", config.to_toml()?);
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
