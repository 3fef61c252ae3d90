//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The config file does not exist.
    #[error("config not found at {path}. Pass --config or create gate.toml")]
    ConfigNotFound { path: PathBuf },

    /// `--user` was given without `--password`, or the other way round.
    #[error("--user and --password must be given together")]
    IncompleteBasicAuth,

    /// An error occurred in the gate layer.
    #[error(transparent)]
    Gate(#[from] gate::Error),

    /// Failed to render JSON output.
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
