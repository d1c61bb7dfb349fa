//! Read-only secrets store.
//!
//! `secrets.toml` is a flat table of string values kept next to the
//! config file, e.g. `GROQ_API_KEY = "gsk_..."`. A missing file is an
//! empty store, not an error.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use colloquy_common::ConfigError;
use tracing::{debug, warn};

use crate::toml_loader::config_dir;

#[derive(Clone, Default)]
pub struct SecretsStore {
    values: HashMap<String, String>,
}

impl SecretsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from in-memory pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load `secrets.toml` from a path. Non-string entries are skipped.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("no secrets file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
        })?;
        let table: toml::Table = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse secrets: {e}")))?;

        let mut values = HashMap::new();
        for (key, value) in table {
            match value {
                toml::Value::String(s) => {
                    values.insert(key, s);
                }
                _ => warn!(key = %key, "ignoring non-string secret"),
            }
        }
        debug!(count = values.len(), "loaded secrets from {}", path.display());
        Ok(Self { values })
    }

    /// Load `secrets.toml` from the colloquy config directory.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_path(&config_dir()?.join("secrets.toml"))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for SecretsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("SecretsStore").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_store() {
        let store =
            SecretsStore::load_from_path(Path::new("/tmp/nonexistent_colloquy_secrets.toml"))
                .unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn loads_string_values_and_skips_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "GROQ_API_KEY = \"gsk_abc\"\nretries = 3\n").unwrap();

        let store = SecretsStore::load_from_path(&path).unwrap();
        assert_eq!(store.get("GROQ_API_KEY"), Some("gsk_abc"));
        assert_eq!(store.get("retries"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(&path, "= nope").unwrap();

        let result = SecretsStore::load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn debug_lists_keys_only() {
        let store = SecretsStore::from_pairs([("GROQ_API_KEY", "gsk_hidden")]);
        let dbg = format!("{store:?}");
        assert!(dbg.contains("GROQ_API_KEY"));
        assert!(!dbg.contains("gsk_hidden"));
    }
}
