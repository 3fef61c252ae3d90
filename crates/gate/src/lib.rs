//! Ready-made credential checks and resource predicates for [`grant`].
//!
//! The `grant` crate only knows how to compose checks. This crate supplies
//! the checks a file-serving resource owner typically needs:
//!
//! - [`Credentials`], parsed from an `Authorization` header or built directly.
//! - [`TokenVerifier`] and [`BasicVerifier`] for bearer tokens and basic auth.
//! - [`PathMatcher`] and [`FileSet`] for path patterns and exact file lists.
//! - [`GateConfig`], which assembles all of the above from a TOML file.
//!
//! # Example
//!
//! ```
//! use gate::{Credentials, GateConfig};
//! use std::path::PathBuf;
//!
//! let config = GateConfig::parse(r#"
//! [[grant]]
//! name = "ci"
//! tokens = ["s3cr3t"]
//! paths = ["/srv/data/**"]
//! timeout_secs = 3600
//! "#)?;
//! let grants = config.build()?;
//!
//! let creds = Credentials::from_header("Bearer s3cr3t")?;
//! let path = PathBuf::from("/srv/data/report.csv");
//! assert!(grant::check(&creds, &path, &grants)?);
//! # Ok::<(), gate::Error>(())
//! ```

mod config;
mod credentials;
mod error;
mod matcher;
mod verifier;

pub use config::{GateConfig, GrantConfig, NamedGrant};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use matcher::{FileSet, PathMatcher};
pub use verifier::{BasicVerifier, TokenVerifier};
