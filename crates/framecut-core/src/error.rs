//! Error types for FrameCut.

use thiserror::Error;

/// Main error type for FrameCut operations.
#[derive(Error, Debug)]
pub enum FramecutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for FrameCut operations.
pub type Result<T> = std::result::Result<T, FramecutError>;
