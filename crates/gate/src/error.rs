//! Gate error types.

use thiserror::Error;

/// Gate errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The gate configuration is invalid.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// Failed to parse a config file.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// An `Authorization` header could not be decoded.
    #[error("malformed authorization header: {0}")]
    Header(String),

    /// An I/O error occurred while reading config.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Grant(#[from] grant::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
