use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn hourglass_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".hourglass"))
}

pub fn ensure_hourglass_home() -> Result<PathBuf> {
    let dir = hourglass_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(hourglass_home()?.join("config.toml"))
}

pub fn default_log_path() -> Result<PathBuf> {
    Ok(ensure_hourglass_home()?.join("hourglass.log"))
}
