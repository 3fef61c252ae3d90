//! Grant error types.

use thiserror::Error;

/// Boxed error produced by caller-supplied check functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Grant errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The grant is no longer valid (expired or cancelled).
    ///
    /// Only produced by [`check`](crate::check) and
    /// [`check_one`](crate::check_one), never by grant implementations.
    #[error("grant not valid")]
    Invalid,

    /// A credential check itself failed, as opposed to rejecting credentials.
    #[error("verification failed: {0}")]
    Verification(String),

    /// A resource-match check itself failed, as opposed to rejecting the resource.
    #[error("allowance check failed: {0}")]
    Allowance(String),

    /// Any other failure reported by a caller-supplied function.
    #[error(transparent)]
    Backend(#[from] BoxError),
}

impl Error {
    /// Returns true for the invalid-grant sentinel.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Error::Invalid)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
