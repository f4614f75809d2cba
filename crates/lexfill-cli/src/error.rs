//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine error
    #[error(transparent)]
    Engine(#[from] lexfill_engine::EngineError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] lexfill_store::StoreError),

    /// Advisor error
    #[error("Advisor error: {0}")]
    Advisor(#[from] lexfill_advisor::AdvisorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A submitted value was rejected
    #[error("Value rejected for '{}': {}", .0.key, .0.reason)]
    Rejected(lexfill_engine::FailureRecord),

    /// No session with this ID
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}
