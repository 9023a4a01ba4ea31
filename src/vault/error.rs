// Safescan — Vault error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Failed to launch PACLI at '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `detail` is stderr, or stdout when PACLI wrote nothing to stderr.
    #[error("PACLI {command} exited with status {status}: {detail}")]
    Command {
        command: String,
        status: i32,
        detail: String,
    },

    #[error("Unparsable PACLI output: {0}")]
    Output(#[from] csv::Error),
}
