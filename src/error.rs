// Safescan — Top-level error types
//
// Aggregates errors from the vault, report, and config modules into a single
// error enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all Safescan operations.
#[derive(Debug, Error)]
pub enum SafescanError {
    #[error("Vault error: {0}")]
    Vault(#[from] crate::vault::VaultError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] crate::report::CheckpointError),

    #[error("Report error: {0}")]
    Report(#[from] crate::report::ReportError),

    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Enrichment stopped at `file`; the remaining work is in the checkpoint.
    #[error("Enrichment failed at '{file}': {source}")]
    Enrichment {
        file: String,
        #[source]
        source: crate::vault::VaultError,
    },
}

pub type Result<T> = std::result::Result<T, SafescanError>;
