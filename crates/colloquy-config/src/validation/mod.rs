//! Full configuration validation.
//!
//! Each domain has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod provider;
mod voice;

#[cfg(test)]
mod tests;

use crate::schema::ColloquyConfig;
use colloquy_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ColloquyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    provider::validate_provider(&mut errors, config);
    provider::validate_session(&mut errors, config);
    provider::validate_logging(&mut errors, config);
    voice::validate_voice(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
