// CLI module for qovcheck
//
// Presentation only: every verdict shown here is computed by the library.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Commands, Config, OutputFormat};
pub use output::OutputFormatter;

use thiserror::Error;

// Error type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Qov(#[from] qovcheck::QovError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Too many frames: {frames} (must be at most {max})")]
    TooManyFrames { frames: u32, max: u32 },
}
