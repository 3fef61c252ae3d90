//! Gate configuration loaded from TOML.

use std::any::Any;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use grant::{Clock, Grant, GrantExt, SystemClock};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{BasicVerifier, Error, FileSet, PathMatcher, Result, TokenVerifier};

/// Top-level gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Grants, any one of which may admit a request.
    #[serde(default, rename = "grant")]
    pub grants: Vec<GrantConfig>,
}

/// One configured grant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantConfig {
    /// Display name. Defaults to `grant-<index>`.
    pub name: Option<String>,

    /// Accepted bearer tokens.
    #[serde(default)]
    pub tokens: Vec<String>,

    /// Accepted basic-auth users (username to password).
    #[serde(default)]
    pub users: BTreeMap<String, String>,

    /// Allowed path patterns (see [`PathMatcher`]).
    #[serde(default)]
    pub paths: Vec<String>,

    /// Allowed individual files.
    #[serde(default)]
    pub files: Vec<String>,

    /// Lifetime in seconds, counted from when the grant is built.
    pub timeout_secs: Option<u64>,

    /// Absolute expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A built grant together with its configured name.
pub struct NamedGrant {
    pub name: String,
    pub grant: Box<dyn Grant>,
}

impl Grant for NamedGrant {
    fn valid(&self) -> bool {
        self.grant.valid()
    }

    fn verify(&self, credentials: &dyn Any) -> grant::Result<bool> {
        self.grant.verify(credentials)
    }

    fn allows(&self, resource: &dyn Any) -> grant::Result<bool> {
        self.grant.allows(resource)
    }
}

impl std::fmt::Debug for NamedGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedGrant")
            .field("name", &self.name)
            .field("valid", &self.grant.valid())
            .finish()
    }
}

impl GateConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::parse(&content)?;
        debug!(
            path = %path.as_ref().display(),
            grants = config.grants.len(),
            "loaded gate config"
        );
        Ok(config)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Build every configured grant against the wall clock.
    pub fn build(&self) -> Result<Vec<NamedGrant>> {
        self.build_with_clock(Arc::new(SystemClock))
    }

    /// Build every configured grant, reading time from `clock`.
    pub fn build_with_clock(&self, clock: Arc<dyn Clock>) -> Result<Vec<NamedGrant>> {
        self.grants
            .iter()
            .enumerate()
            .map(|(index, config)| config.build(index, clock.clone()))
            .collect()
    }
}

impl GrantConfig {
    fn name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("grant-{index}"))
    }

    fn build(&self, index: usize, clock: Arc<dyn Clock>) -> Result<NamedGrant> {
        let name = self.name(index);

        if self.tokens.is_empty() && self.users.is_empty() {
            return Err(Error::Invalid(format!(
                "grant '{name}' verifies nobody: set tokens or users"
            )));
        }
        if self.paths.is_empty() && self.files.is_empty() {
            return Err(Error::Invalid(format!(
                "grant '{name}' allows nothing: set paths or files"
            )));
        }

        let mut chain = grant::new().boxed();
        if !self.tokens.is_empty() {
            chain = TokenVerifier::new(self.tokens.iter().cloned())
                .attach(chain)
                .boxed();
        }
        if !self.users.is_empty() {
            chain = BasicVerifier::new(self.users.clone()).attach(chain).boxed();
        }
        if !self.paths.is_empty() {
            chain = PathMatcher::new(self.paths.iter().cloned())
                .attach(chain)
                .boxed();
        }
        if !self.files.is_empty() {
            chain = FileSet::new(self.files.iter().cloned())
                .attach(chain)
                .boxed();
        }
        if let Some(secs) = self.timeout_secs {
            chain = chain
                .with_timeout_on(Duration::from_secs(secs), clock.clone())
                .boxed();
        }
        if let Some(deadline) = self.expires_at {
            chain = chain.with_deadline_on(deadline, clock).boxed();
        }

        if !chain.valid() {
            warn!(grant = %name, "grant is already expired");
        }
        debug!(grant = %name, "built grant");

        Ok(NamedGrant { name, grant: chain })
    }
}
