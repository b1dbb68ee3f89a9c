//! Error types for docdrop.

use thiserror::Error;

/// Common error type for docdrop.
#[derive(Error, Debug)]
pub enum DocdropError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Upload payload larger than the configured ceiling.
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    SizeLimitExceeded {
        /// Size of the rejected payload in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        limit: u64,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for docdrop operations.
pub type Result<T> = std::result::Result<T, DocdropError>;
