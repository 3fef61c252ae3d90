//! Validity layers: predicates, cancellation and external signals.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::{Grant, Result};

/// A grant with an extra liveness predicate.
///
/// `valid()` evaluates the predicate first and only then the wrapped chain.
/// Verification and allowance are passed through unchanged.
pub struct Validated<G> {
    inner: G,
    valid: Box<dyn Fn() -> bool + Send + Sync>,
}

impl<G: Grant> Validated<G> {
    pub fn new<F>(inner: G, valid: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            inner,
            valid: Box::new(valid),
        }
    }
}

/// Wraps a liveness predicate so that its first `false` sticks.
pub(crate) fn latched<F>(live: F) -> impl Fn() -> bool + Send + Sync + 'static
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    let dead = AtomicBool::new(false);
    move || {
        if dead.load(Ordering::SeqCst) {
            return false;
        }
        if live() {
            return true;
        }
        dead.store(true, Ordering::SeqCst);
        false
    }
}

impl<G: Grant> Grant for Validated<G> {
    fn valid(&self) -> bool {
        (self.valid)() && self.inner.valid()
    }

    fn verify(&self, credentials: &dyn Any) -> Result<bool> {
        self.inner.verify(credentials)
    }

    fn allows(&self, resource: &dyn Any) -> Result<bool> {
        self.inner.allows(resource)
    }
}

impl<G: fmt::Debug> fmt::Debug for Validated<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validated")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// Immediately marks the associated grant invalid.
///
/// Calls after the first have no effect. Clones cancel the same grant.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            debug!("grant cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// An externally controlled cancellation or expiry signal.
///
/// Once a signal has fired it must stay fired.
pub trait Signal: Send + Sync {
    fn fired(&self) -> bool;
}

impl Signal for CancelHandle {
    fn fired(&self) -> bool {
        self.is_cancelled()
    }
}

impl Signal for Arc<AtomicBool> {
    fn fired(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

/// Fires when the sender publishes `true` or goes away.
impl Signal for watch::Receiver<bool> {
    fn fired(&self) -> bool {
        *self.borrow() || self.has_changed().is_err()
    }
}
