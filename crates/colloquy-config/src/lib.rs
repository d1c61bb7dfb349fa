//! Colloquy configuration system.
//!
//! TOML-based configuration with full validation, plus a read-only
//! secrets store. All config sections use defaults so partial configs
//! work out of the box.

pub mod schema;
pub mod secrets;
pub mod toml_loader;
pub mod validation;

pub use schema::ColloquyConfig;
pub use secrets::SecretsStore;

use colloquy_common::ConfigError;
use std::path::Path;

/// Load config from an explicit path, or from the platform default path
/// (creating it with defaults when missing).
pub fn load_config(path: Option<&Path>) -> Result<ColloquyConfig, ConfigError> {
    match path {
        Some(p) => toml_loader::load_from_path(p),
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string with secrets removed.
pub fn config_to_json(config: &ColloquyConfig) -> String {
    let mut redacted = config.clone();
    if redacted.provider.api_key.is_some() {
        redacted.provider.api_key = Some("[REDACTED]".into());
    }
    if redacted.provider.fallback_api_key.is_some() {
        redacted.provider.fallback_api_key = Some("[REDACTED]".into());
    }
    if redacted.voice.api_key.is_some() {
        redacted.voice.api_key = Some("[REDACTED]".into());
    }
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&ColloquyConfig::default());
        assert!(json.contains("\"provider\""));
        assert!(json.contains("\"persona\""));
        assert!(json.contains("\"session\""));
        assert!(json.contains("\"voice\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_to_json_redacts_keys() {
        let mut config = ColloquyConfig::default();
        config.provider.api_key = Some("gsk_topsecret".into());
        let json = config_to_json(&config);
        assert!(!json.contains("gsk_topsecret"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn load_config_with_explicit_missing_path_fails() {
        let result = load_config(Some(Path::new("/tmp/nonexistent_colloquy.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
