//! Error types for the lpa_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lpa_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested kit is not in the registry
    #[error("Unknown kit: {0}")]
    UnknownKit(String),

    /// Kit model cannot be inverted (zero slope)
    #[error("Degenerate model for kit {0}: slope is zero")]
    DegenerateModel(String),

    /// Input value outside the accepted domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Risk band thresholds are malformed
    #[error("Invalid risk thresholds: {0}")]
    InvalidThresholds(String),

    /// Registry validation error
    #[error("Registry validation error: {0}")]
    RegistryValidation(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
