// Safescan — Application Entry Point
//
// Parses CLI arguments, initializes structured logging, and dispatches to the
// command handler. Log lines carry file names and counts, never category
// values; per-file progress is at debug.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use safescan::cli::{execute, Cli};

fn main() {
    // RUST_LOG=safescan=debug prints per-file progress.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("safescan=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
