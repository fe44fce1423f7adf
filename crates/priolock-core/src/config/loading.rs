//! Config file loading and layering.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::config::types::PriolockConfig;
use crate::errors::ConfigError;

/// Partial view of a config file: only the fields that are actually
/// present override the layer below.
#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    monitor: Option<PartialMonitor>,
    apply: Option<PartialApply>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialMonitor {
    interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialApply {
    disable_boost: Option<bool>,
}

/// Load configuration from the hierarchy of config files.
///
/// Defaults, then `~/.priolock/config.toml`, then `./.priolock/config.toml`,
/// later layers overriding earlier ones field by field. The result is
/// validated before being returned.
pub fn load_hierarchy() -> Result<PriolockConfig, ConfigError> {
    let mut config = PriolockConfig::default();

    if let Some(user_path) = user_config_path()
        && let Some(partial) = load_file(&user_path)?
    {
        overlay(&mut config, partial);
        debug!(event = "core.config.user_loaded", path = %user_path.display());
    }

    let project_path = PathBuf::from(".priolock").join("config.toml");
    if let Some(partial) = load_file(&project_path)? {
        overlay(&mut config, partial);
        debug!(event = "core.config.project_loaded", path = %project_path.display());
    }

    config.validate()?;
    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".priolock").join("config.toml"))
}

fn load_file(path: &Path) -> Result<Option<PartialConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let partial = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(partial))
}

fn overlay(config: &mut PriolockConfig, partial: PartialConfig) {
    if let Some(monitor) = partial.monitor
        && let Some(interval_secs) = monitor.interval_secs
    {
        config.monitor.interval_secs = interval_secs;
    }
    if let Some(apply) = partial.apply
        && let Some(disable_boost) = apply.disable_boost
    {
        config.apply.disable_boost = disable_boost;
    }
}
