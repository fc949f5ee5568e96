//! Storage Layer
//!
//! Resolves the per-user directories used for configuration and for the
//! cropped / captured images handed to the recognizer. Session state itself is
//! never persisted.

use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "scanpass", "ScanPass")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = project_dirs()?.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Default location of `config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

/// Get the cache directory where captured and cropped images are written
pub fn get_cache_dir() -> Result<PathBuf> {
    let cache_dir = project_dirs()?.cache_dir().join("images");
    std::fs::create_dir_all(&cache_dir)?;
    debug!("Image cache directory: {:?}", cache_dir);

    Ok(cache_dir)
}
