//! Common error types for FieldDex

use thiserror::Error;

/// Common result type for FieldDex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across FieldDex services
#[derive(Error, Debug)]
pub enum Error {
    /// Label schema matched neither recognized orientation (fatal, startup-only)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image payload could not be decoded into a model input
    #[error("Image decode error: {0}")]
    Decode(String),

    /// Classifier collaborator failure
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// HTTP server error
    #[error("HTTP server error: {0}")]
    Http(String),
}
