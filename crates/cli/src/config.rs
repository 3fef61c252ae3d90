//! Configuration loading from gate.toml.

use std::path::Path;

use gate::{GateConfig, NamedGrant};

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG: &str = "gate.toml";

/// Load and build the grants configured at `path`.
pub fn load_grants(path: &Path) -> Result<Vec<NamedGrant>> {
    if !path.exists() {
        return Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let config = GateConfig::load(path)?;
    Ok(config.build()?)
}
