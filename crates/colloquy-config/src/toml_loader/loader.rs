//! Core TOML config loading: read from path or platform default.

use crate::schema::ColloquyConfig;
use crate::validation;
use colloquy_common::ConfigError;
use std::path::Path;
use tracing::info;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. The result is validated and
/// any range error is returned, since a bad config must stop startup.
pub fn load_from_path(path: &Path) -> Result<ColloquyConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: ColloquyConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    validation::validate(&config)?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<ColloquyConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(ColloquyConfig::default())
        }
        Err(e) => Err(e),
    }
}
