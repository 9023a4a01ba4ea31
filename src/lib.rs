// Safescan — Library root
//
// Re-exports the vault, report, pipeline, config, and CLI modules.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod vault;

pub use error::{Result, SafescanError};
