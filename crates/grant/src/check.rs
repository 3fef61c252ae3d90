//! Evaluating credentials and a resource against a set of grants.

use std::any::Any;

use tracing::{debug, trace};

use crate::{Error, Grant, Result};

/// Checks a single grant: it must be valid, verify the credentials and allow
/// the resource, in that order.
///
/// An invalid grant yields [`Error::Invalid`]. Failed verification returns its
/// result as is, so a clean deny stays `Ok(false)`.
pub fn check_one<G>(credentials: &dyn Any, resource: &dyn Any, grant: G) -> Result<bool>
where
    G: Grant,
{
    if !grant.valid() {
        return Err(Error::Invalid);
    }
    if !grant.verify(credentials)? {
        return Ok(false);
    }
    grant.allows(resource)
}

/// Reports whether *any* of the grants is valid, verifies the credentials
/// and allows the resource.
///
/// Grants are tried in order and the first full success wins. When none
/// succeeds, the error of the last grant that failed with something other
/// than [`Error::Invalid`] is returned; if there was none the result is a
/// clean `Ok(false)`. No grants at all is a clean deny.
pub fn check<I>(credentials: &dyn Any, resource: &dyn Any, grants: I) -> Result<bool>
where
    I: IntoIterator,
    I::Item: Grant,
{
    let mut last_err = None;

    for (index, grant) in grants.into_iter().enumerate() {
        match check_one(credentials, resource, grant) {
            Ok(true) => {
                debug!(index, "access granted");
                return Ok(true);
            }
            Ok(false) => trace!(index, "grant denied"),
            Err(Error::Invalid) => trace!(index, "grant not valid"),
            Err(err) => {
                trace!(index, error = %err, "grant failed");
                last_err = Some(err);
            }
        }
    }

    match last_err {
        Some(err) => {
            debug!(error = %err, "access denied");
            Err(err)
        }
        None => {
            debug!("access denied");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new, GrantExt};

    fn verified() -> impl Grant {
        new().verify_with(|_| Ok(true))
    }

    fn everything() -> impl Grant {
        verified().allow_with(|_| Ok(true))
    }

    fn expired() -> impl Grant {
        everything().valid_while(|| false)
    }

    fn broken_verify(msg: &'static str) -> impl Grant {
        new()
            .verify_with(move |_| Err(Error::Verification(msg.into())))
            .allow_with(|_| Ok(true))
    }

    #[test]
    fn test_empty_is_clean_deny() {
        let grants: Vec<Box<dyn Grant>> = Vec::new();
        assert!(!check(&(), &(), grants).unwrap());
        assert!(!check(&(), &(), std::iter::empty::<crate::NullGrant>()).unwrap());
    }

    #[test]
    fn test_single_grant_all_three_checks() {
        assert!(check(&(), &(), [everything()]).unwrap());
        assert!(!check(&(), &(), [verified()]).unwrap());
        assert!(!check(&(), &(), [new().allow_with(|_| Ok(true))]).unwrap());
    }

    #[test]
    fn test_any_grant_suffices() {
        let grants: Vec<Box<dyn Grant>> = vec![Box::new(new()), Box::new(everything())];
        assert!(check(&(), &(), &grants).unwrap());

        let grants: Vec<Box<dyn Grant>> = vec![Box::new(everything()), Box::new(expired())];
        assert!(check(&(), &(), &grants).unwrap());

        let grants: Vec<Box<dyn Grant>> =
            vec![Box::new(broken_verify("down")), Box::new(everything())];
        assert!(check(&(), &(), &grants).unwrap());
    }

    #[test]
    fn test_first_success_short_circuits() {
        let probe = everything().valid_while(|| panic!("evaluated after success"));
        let grants: Vec<Box<dyn Grant>> = vec![Box::new(everything()), Box::new(probe)];
        assert!(check(&(), &(), &grants).unwrap());
    }

    #[test]
    fn test_invalid_only_is_clean_deny() {
        assert!(!check(&(), &(), [expired(), expired()]).unwrap());
    }

    #[test]
    fn test_invalid_sentinel_deprioritized() {
        let grants: Vec<Box<dyn Grant>> =
            vec![Box::new(expired()), Box::new(broken_verify("ldap down"))];
        let err = check(&(), &(), &grants).unwrap_err();
        assert_eq!(err.to_string(), "verification failed: ldap down");

        let grants: Vec<Box<dyn Grant>> =
            vec![Box::new(broken_verify("ldap down")), Box::new(expired())];
        let err = check(&(), &(), &grants).unwrap_err();
        assert_eq!(err.to_string(), "verification failed: ldap down");
    }

    #[test]
    fn test_last_error_wins() {
        let grants: Vec<Box<dyn Grant>> = vec![
            Box::new(broken_verify("first")),
            Box::new(new()),
            Box::new(broken_verify("second")),
            Box::new(expired()),
        ];
        let err = check(&(), &(), &grants).unwrap_err();
        assert_eq!(err.to_string(), "verification failed: second");
    }

    #[test]
    fn test_allowance_error_recorded() {
        let grant = verified().allow_with(|_| Err(Error::Allowance("acl timeout".into())));
        let err = check(&(), &(), [grant]).unwrap_err();
        assert!(matches!(err, Error::Allowance(_)));
    }

    #[test]
    fn test_clean_verify_deny_skips_allows() {
        let grant = new().allow_with(|_| Err(Error::Allowance("unreachable".into())));
        assert!(!check(&(), &(), [grant]).unwrap());
    }

    #[test]
    fn test_check_one_reports_invalid() {
        let err = check_one(&(), &(), expired()).unwrap_err();
        assert!(err.is_invalid());
        assert!(check_one(&(), &(), everything()).unwrap());
    }
}
