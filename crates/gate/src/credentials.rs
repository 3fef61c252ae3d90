//! Caller credentials as presented to verifiers.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::{Error, Result};

/// Credential material presented by a caller.
///
/// A caller may carry a bearer token, a username/password pair, both or
/// neither. Verifiers only look at the part they understand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub basic: Option<(String, String)>,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            basic: None,
        }
    }

    pub fn basic(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            token: None,
            basic: Some((user.into(), password.into())),
        }
    }

    /// Parse the value of an HTTP `Authorization` header.
    ///
    /// Supports `Bearer <token>` and `Basic <base64(user:password)>`. Unknown
    /// schemes produce empty credentials; a Basic payload that does not
    /// decode is an error.
    pub fn from_header(value: &str) -> Result<Self> {
        let Some((scheme, rest)) = value.trim().split_once(' ') else {
            return Ok(Self::default());
        };
        let rest = rest.trim();

        if scheme.eq_ignore_ascii_case("bearer") {
            return Ok(Self::bearer(rest));
        }
        if !scheme.eq_ignore_ascii_case("basic") {
            return Ok(Self::default());
        }

        let decoded = STANDARD
            .decode(rest)
            .map_err(|e| Error::Header(e.to_string()))?;
        let decoded = String::from_utf8(decoded).map_err(|e| Error::Header(e.to_string()))?;
        let (user, password) = decoded
            .split_once(':')
            .ok_or_else(|| Error::Header("basic credentials missing ':'".to_string()))?;

        Ok(Self::basic(user, password))
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.basic.is_none()
    }
}
