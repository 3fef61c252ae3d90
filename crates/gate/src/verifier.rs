//! Credential verifiers: bearer tokens and basic auth.

use std::collections::{BTreeMap, HashSet};

use grant::{Grant, GrantExt, Verified};

use crate::Credentials;

/// Accepts callers presenting one of a fixed set of bearer tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenVerifier {
    tokens: HashSet<String>,
}

impl TokenVerifier {
    pub fn new(tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn verify(&self, credentials: &Credentials) -> bool {
        credentials
            .token
            .as_ref()
            .is_some_and(|token| self.tokens.contains(token))
    }

    /// Attach this verifier to a grant.
    pub fn attach<G: Grant>(self, grant: G) -> Verified<G> {
        grant.verify_as(move |credentials: &Credentials| Ok(self.verify(credentials)))
    }
}

/// Accepts callers presenting a known username and matching password.
#[derive(Debug, Clone, Default)]
pub struct BasicVerifier {
    users: BTreeMap<String, String>,
}

impl BasicVerifier {
    pub fn new(users: BTreeMap<String, String>) -> Self {
        Self { users }
    }

    pub fn verify(&self, credentials: &Credentials) -> bool {
        let Some((user, password)) = &credentials.basic else {
            return false;
        };
        self.users.get(user) == Some(password)
    }

    /// Attach this verifier to a grant.
    pub fn attach<G: Grant>(self, grant: G) -> Verified<G> {
        grant.verify_as(move |credentials: &Credentials| Ok(self.verify(credentials)))
    }
}
