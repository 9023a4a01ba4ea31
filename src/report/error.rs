// Safescan — Report error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Checkpoint {path} has no '{column}' column")]
    MissingColumn { path: String, column: String },

    #[error("Invalid Processed value '{value}' for {file}")]
    InvalidProcessed { file: String, value: String },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
