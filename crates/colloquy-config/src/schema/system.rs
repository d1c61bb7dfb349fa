//! System configuration types: logging.

use serde::{Deserialize, Serialize};

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_accepted() {
        assert!(LOG_LEVELS.contains(&LoggingConfig::default().level.as_str()));
    }
}
