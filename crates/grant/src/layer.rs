//! Verification and allowance layers.
//!
//! Both layers follow the same rule. The attached function runs first:
//!
//! - `Ok(true)` grants immediately; the wrapped chain is not consulted.
//! - `Err(e)` consults the wrapped chain. If it grants, so does the layer,
//!   otherwise the layer reports `e` (not the chain's own error).
//! - `Ok(false)` returns whatever the wrapped chain returns.
//!
//! Stacked layers therefore run from the most recently attached inwards and
//! stop at the first success. A failing check never masks a deeper success.

use std::any::Any;
use std::fmt;

use crate::{Grant, Result};

type CheckFn = Box<dyn Fn(&dyn Any) -> Result<bool> + Send + Sync>;

fn layered(outer: Result<bool>, inner: impl FnOnce() -> Result<bool>) -> Result<bool> {
    match outer {
        Ok(true) => Ok(true),
        Ok(false) => inner(),
        Err(err) => match inner() {
            Ok(true) => Ok(true),
            _ => Err(err),
        },
    }
}

/// A grant with an extra credential check.
pub struct Verified<G> {
    inner: G,
    verify: CheckFn,
}

impl<G: Grant> Verified<G> {
    pub fn new<F>(inner: G, verify: F) -> Self
    where
        F: Fn(&dyn Any) -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            inner,
            verify: Box::new(verify),
        }
    }
}

impl<G: Grant> Grant for Verified<G> {
    fn valid(&self) -> bool {
        self.inner.valid()
    }

    fn verify(&self, credentials: &dyn Any) -> Result<bool> {
        layered((self.verify)(credentials), || self.inner.verify(credentials))
    }

    fn allows(&self, resource: &dyn Any) -> Result<bool> {
        self.inner.allows(resource)
    }
}

impl<G: fmt::Debug> fmt::Debug for Verified<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verified")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// A grant with an extra resource check.
pub struct Allowed<G> {
    inner: G,
    allow: CheckFn,
}

impl<G: Grant> Allowed<G> {
    pub fn new<F>(inner: G, allow: F) -> Self
    where
        F: Fn(&dyn Any) -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            inner,
            allow: Box::new(allow),
        }
    }
}

impl<G: Grant> Grant for Allowed<G> {
    fn valid(&self) -> bool {
        self.inner.valid()
    }

    fn verify(&self, credentials: &dyn Any) -> Result<bool> {
        self.inner.verify(credentials)
    }

    fn allows(&self, resource: &dyn Any) -> Result<bool> {
        layered((self.allow)(resource), || self.inner.allows(resource))
    }
}

impl<G: fmt::Debug> fmt::Debug for Allowed<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allowed")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new, Error, GrantExt};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn outer_err() -> Error {
        Error::Verification("outer".into())
    }

    fn inner_err() -> Error {
        Error::Verification("inner".into())
    }

    fn fails_with(msg: &'static str) -> impl Fn(&dyn Any) -> Result<bool> + Send + Sync {
        move |_| Err(Error::Verification(msg.into()))
    }

    fn prefix(p: &'static str) -> impl Fn(&String) -> Result<bool> + Send + Sync {
        move |r| Ok(r.starts_with(p))
    }

    #[test]
    fn test_layered_rules() {
        assert!(layered(Ok(true), || Ok(false)).unwrap());
        assert!(layered(Ok(true), || Err(inner_err())).unwrap());

        assert!(layered(Err(outer_err()), || Ok(true)).unwrap());
        let err = layered(Err(outer_err()), || Ok(false)).unwrap_err();
        assert_eq!(err.to_string(), "verification failed: outer");
        let err = layered(Err(outer_err()), || Err(inner_err())).unwrap_err();
        assert_eq!(err.to_string(), "verification failed: outer");

        assert!(layered(Ok(false), || Ok(true)).unwrap());
        assert!(!layered(Ok(false), || Ok(false)).unwrap());
        let err = layered(Ok(false), || Err(inner_err())).unwrap_err();
        assert_eq!(err.to_string(), "verification failed: inner");
    }

    #[test]
    fn test_verify_success_short_circuits_inner() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();

        let grant = new()
            .verify_with(move |_| {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok(false)
            })
            .verify_with(|_| Ok(true));

        assert!(grant.verify(&()).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_verify_error_recovered_by_inner_success() {
        let grant = new()
            .verify_with(|_| Ok(true))
            .verify_with(fails_with("ldap unreachable"));

        assert!(grant.verify(&()).unwrap());
    }

    #[test]
    fn test_verify_error_surfaces_outer_not_inner() {
        let grant = new()
            .verify_with(fails_with("inner"))
            .verify_with(fails_with("outer"));

        let err = grant.verify(&()).unwrap_err();
        assert_eq!(err.to_string(), "verification failed: outer");

        let grant = new().verify_with(fails_with("only"));
        let err = grant.verify(&()).unwrap_err();
        assert_eq!(err.to_string(), "verification failed: only");
    }

    #[test]
    fn test_verify_clean_deny_passes_inner_through() {
        let grant = new()
            .verify_with(fails_with("inner"))
            .verify_with(|_| Ok(false));
        let err = grant.verify(&()).unwrap_err();
        assert_eq!(err.to_string(), "verification failed: inner");

        let grant = new().verify_with(|_| Ok(false));
        assert!(!grant.verify(&()).unwrap());
    }

    #[test]
    fn test_allow_layering_matches_verify() {
        let grant = new()
            .allow_as::<String, _>(prefix("/srv/"))
            .allow_as::<String, _>(prefix("/tmp/"))
            .allow_with(|_| Err(Error::Allowance("index offline".into())));

        assert!(grant.allows(&"/srv/data".to_string()).unwrap());
        assert!(grant.allows(&"/tmp/x".to_string()).unwrap());
        let err = grant.allows(&"/etc/passwd".to_string()).unwrap_err();
        assert!(matches!(err, Error::Allowance(_)));
    }

    #[test]
    fn test_layers_leave_other_checks_alone() {
        let (grant, cancel) = new().with_cancel();
        let grant = grant.verify_with(|_| Ok(true));
        assert!(!grant.allows(&()).unwrap());
        assert!(grant.valid());

        cancel.cancel();
        assert!(!grant.valid());

        let grant = grant.allow_with(|_| Ok(true));
        assert!(!grant.valid());
        assert!(grant.verify(&()).unwrap());
    }
}
