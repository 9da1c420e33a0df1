//! Init command implementation

use anyhow::{bail, Result};
use std::path::PathBuf;

use selnav::config::Config;

/// Write the commented default configuration.
/// By default creates the global config at ~/.selnav/config.toml
pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if !Config::init_file(&config_path, force)? {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    println!("Created: {}", config_path.display());
    Ok(())
}
