//! The grant interface and the base grant.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::layer::{Allowed, Verified};
use crate::validity::{latched, CancelHandle, Signal, Validated};
use crate::Result;

/// A capability guarding some resource.
///
/// A grant combines three independent checks: whether it is still alive
/// ([`valid`](Grant::valid)), whether a caller's credentials satisfy it
/// ([`verify`](Grant::verify)) and whether it covers a given resource
/// ([`allows`](Grant::allows)).
///
/// Credentials and resources are opaque to the grant. Implementations that
/// expect a particular type must treat any other type as a clean deny
/// (`Ok(false)`), never as an error.
pub trait Grant: Send + Sync {
    /// Reports whether this grant is still valid.
    ///
    /// Once a grant has reported `false` it must never report `true` again.
    fn valid(&self) -> bool;

    /// Reports whether the given credentials satisfy this grant.
    ///
    /// `Ok(false)` means the credentials are absent or wrong. `Err` means the
    /// check itself could not be completed.
    fn verify(&self, credentials: &dyn Any) -> Result<bool>;

    /// Reports whether this grant covers the given resource, such as a path.
    fn allows(&self, resource: &dyn Any) -> Result<bool>;
}

impl<G: Grant + ?Sized> Grant for &G {
    fn valid(&self) -> bool {
        (**self).valid()
    }

    fn verify(&self, credentials: &dyn Any) -> Result<bool> {
        (**self).verify(credentials)
    }

    fn allows(&self, resource: &dyn Any) -> Result<bool> {
        (**self).allows(resource)
    }
}

impl<G: Grant + ?Sized> Grant for Box<G> {
    fn valid(&self) -> bool {
        (**self).valid()
    }

    fn verify(&self, credentials: &dyn Any) -> Result<bool> {
        (**self).verify(credentials)
    }

    fn allows(&self, resource: &dyn Any) -> Result<bool> {
        (**self).allows(resource)
    }
}

impl<G: Grant + ?Sized> Grant for Arc<G> {
    fn valid(&self) -> bool {
        (**self).valid()
    }

    fn verify(&self, credentials: &dyn Any) -> Result<bool> {
        (**self).verify(credentials)
    }

    fn allows(&self, resource: &dyn Any) -> Result<bool> {
        (**self).allows(resource)
    }
}

/// The empty grant: always valid, verifies nobody, allows nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullGrant;

impl Grant for NullGrant {
    fn valid(&self) -> bool {
        true
    }

    fn verify(&self, _credentials: &dyn Any) -> Result<bool> {
        Ok(false)
    }

    fn allows(&self, _resource: &dyn Any) -> Result<bool> {
        Ok(false)
    }
}

/// Returns the empty grant every chain starts from.
pub fn new() -> NullGrant {
    NullGrant
}

/// Combinators available on every grant.
///
/// Each combinator consumes the grant and returns a new one that owns it.
pub trait GrantExt: Grant + Sized {
    /// Attach a validity predicate, called on every [`Grant::valid`].
    ///
    /// Predicates stack: all of them must hold for the grant to be valid.
    fn valid_while<F>(self, valid: F) -> Validated<Self>
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Validated::new(self, valid)
    }

    /// Returns a grant that becomes invalid once the handle is cancelled.
    fn with_cancel(self) -> (Validated<Self>, CancelHandle) {
        let handle = CancelHandle::new();
        let live = handle.clone();
        (self.valid_while(move || !live.is_cancelled()), handle)
    }

    /// Returns a grant that becomes invalid once the signal fires.
    ///
    /// The first observed firing is latched, so the grant stays invalid even
    /// if the signal later reads as unfired.
    fn with_signal<S>(self, signal: S) -> Validated<Self>
    where
        S: Signal + 'static,
    {
        self.valid_while(latched(move || !signal.fired()))
    }

    /// Returns a grant that expires at `deadline` according to the wall clock.
    fn with_deadline(self, deadline: DateTime<Utc>) -> Validated<Self> {
        self.with_deadline_on(deadline, SystemClock)
    }

    /// Returns a grant that expires at `deadline` according to `clock`.
    ///
    /// Expiry is latched: a clock stepping back past `deadline` does not
    /// revive the grant.
    fn with_deadline_on<C>(self, deadline: DateTime<Utc>, clock: C) -> Validated<Self>
    where
        C: Clock + 'static,
    {
        self.valid_while(latched(move || clock.now() < deadline))
    }

    /// Returns a grant that expires `timeout` after construction.
    fn with_timeout(self, timeout: Duration) -> Validated<Self> {
        self.with_timeout_on(timeout, SystemClock)
    }

    /// Like [`with_timeout`](GrantExt::with_timeout), reading time from `clock`.
    ///
    /// The expiry point is fixed here, not recomputed per call.
    fn with_timeout_on<C>(self, timeout: Duration, clock: C) -> Validated<Self>
    where
        C: Clock + 'static,
    {
        let deadline = crate::clock::deadline_after(clock.now(), timeout);
        self.with_deadline_on(deadline, clock)
    }

    /// Attach a credential check. See [`Verified`] for the layering rules.
    fn verify_with<F>(self, verify: F) -> Verified<Self>
    where
        F: Fn(&dyn Any) -> Result<bool> + Send + Sync + 'static,
    {
        Verified::new(self, verify)
    }

    /// Attach a credential check for credentials of type `T`.
    ///
    /// Credentials of any other type are a clean deny for this layer.
    fn verify_as<T, F>(self, verify: F) -> Verified<Self>
    where
        T: Any,
        F: Fn(&T) -> Result<bool> + Send + Sync + 'static,
    {
        self.verify_with(move |credentials: &dyn Any| match credentials.downcast_ref::<T>() {
            Some(credentials) => verify(credentials),
            None => Ok(false),
        })
    }

    /// Attach a resource check. See [`Allowed`] for the layering rules.
    fn allow_with<F>(self, allow: F) -> Allowed<Self>
    where
        F: Fn(&dyn Any) -> Result<bool> + Send + Sync + 'static,
    {
        Allowed::new(self, allow)
    }

    /// Attach a resource check for resources of type `T`.
    ///
    /// Resources of any other type are a clean deny for this layer.
    fn allow_as<T, F>(self, allow: F) -> Allowed<Self>
    where
        T: Any,
        F: Fn(&T) -> Result<bool> + Send + Sync + 'static,
    {
        self.allow_with(move |resource: &dyn Any| match resource.downcast_ref::<T>() {
            Some(resource) => allow(resource),
            None => Ok(false),
        })
    }

    /// Erase the chain's type.
    fn boxed(self) -> Box<dyn Grant>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<G: Grant> GrantExt for G {}
