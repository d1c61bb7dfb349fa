//! Configuration schema types for Colloquy.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod provider;
mod session;
mod system;
mod voice;

pub use provider::*;
pub use session::*;
pub use system::*;
pub use voice::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ColloquyConfig {
    pub provider: ProviderConfig,
    pub persona: PersonaConfig,
    pub session: SessionConfig,
    pub voice: VoiceConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: ColloquyConfig = toml::from_str("").unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Groq);
        assert_eq!(config.persona.default, PersonaKind::Ingres);
        assert_eq!(config.session.history, HistoryConfig::Full);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: ColloquyConfig = toml::from_str(
            r#"
[provider]
kind = "gemini"
temperature = 0.2

[persona]
default = "general"
"#,
        )
        .unwrap();
        assert_eq!(config.provider.kind, ProviderKind::Gemini);
        assert!((config.provider.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.provider.max_tokens, 1024);
        assert_eq!(config.persona.default, PersonaKind::General);
        assert!(config.voice.enabled);
    }

    #[test]
    fn unknown_provider_kind_is_rejected() {
        let result: Result<ColloquyConfig, _> = toml::from_str("[provider]\nkind = \"openai\"");
        assert!(result.is_err());
    }
}
