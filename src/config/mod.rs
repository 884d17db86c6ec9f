//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<MasterVolumeConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;
    let config: MasterVolumeConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Load configuration, falling back to the defaults when the file is absent
pub fn load_config_or_default(path: &Path) -> Result<MasterVolumeConfig> {
    if !path.exists() {
        log::debug!("no config at {:?}, using defaults", path);
        return Ok(MasterVolumeConfig::default());
    }
    load_config(path)
}
