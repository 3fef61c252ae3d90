//! Composable access grants.
//!
//! A [`Grant`] gates access to some resource behind three independent checks:
//!
//! 1. **Validity**: is the grant still alive (not expired, not cancelled)?
//! 2. **Verification**: do the caller's credentials satisfy it?
//! 3. **Allowance**: does it cover this particular resource?
//!
//! Resource owners accept a grant instead of a concrete credential type, so
//! the way callers authenticate stays decoupled from what they can reach.
//!
//! # Building grants
//!
//! Every chain starts from [`new()`], which is valid forever, verifies nobody
//! and allows nothing. Combinators from [`GrantExt`] wrap it with one more
//! check at a time:
//!
//! - [`valid_while`](GrantExt::valid_while), [`with_cancel`](GrantExt::with_cancel),
//!   [`with_signal`](GrantExt::with_signal), [`with_deadline`](GrantExt::with_deadline),
//!   [`with_timeout`](GrantExt::with_timeout) add liveness predicates.
//! - [`verify_with`](GrantExt::verify_with) / [`verify_as`](GrantExt::verify_as)
//!   add a credential check.
//! - [`allow_with`](GrantExt::allow_with) / [`allow_as`](GrantExt::allow_as)
//!   add a resource check.
//!
//! Credential and resource checks stack: the most recently attached runs
//! first and the first success wins. An erroring check never masks a deeper
//! success (see [`Verified`] and [`Allowed`]).
//!
//! # Checking access
//!
//! [`check`] evaluates several grants and succeeds if any one of them does.
//!
//! # Example
//!
//! ```
//! use grant::{check, GrantExt};
//! use std::time::Duration;
//!
//! struct Token(&'static str);
//!
//! let grant = grant::new()
//!     .verify_as(|t: &Token| Ok(t.0 == "s3cr3t"))
//!     .allow_as(|path: &String| Ok(path.starts_with("/srv/")))
//!     .with_timeout(Duration::from_secs(60));
//!
//! let path = "/srv/data".to_string();
//! assert!(check(&Token("s3cr3t"), &path, [&grant])?);
//! assert!(!check(&Token("guess"), &path, [&grant])?);
//! # Ok::<(), grant::Error>(())
//! ```

mod check;
mod clock;
mod error;
mod grant;
mod layer;
mod validity;

pub use check::{check, check_one};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{BoxError, Error, Result};
pub use grant::{new, Grant, GrantExt, NullGrant};
pub use layer::{Allowed, Verified};
pub use validity::{CancelHandle, Signal, Validated};
