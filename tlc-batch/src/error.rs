//! Error types shared by the batch runner.

use std::path::PathBuf;

/// Common error types for the batch runner
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// I/O error while writing reports or scratch files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings failed validation
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Settings could not be loaded from their sources
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Settings could not be rendered back to TOML
    #[error("Settings serialization error: {0}")]
    SettingsDump(#[from] toml::ser::Error),

    /// JSON result export failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The generated checker document is malformed
    #[error("Checker document line {line}: {message}")]
    Document { line: usize, message: String },

    /// The TLC program could not be started
    #[error("Failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The target specification path has no usable parent directory or module name
    #[error("Invalid target specification path: {}", .0.display())]
    InvalidTarget(PathBuf),
}

/// Result type for batch operations
pub type BatchResult<T> = Result<T, BatchError>;
