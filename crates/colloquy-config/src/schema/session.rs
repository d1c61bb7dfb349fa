//! Persona and session configuration types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which built-in assistant persona is active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PersonaKind {
    /// INGRES database specialist.
    #[default]
    Ingres,
    /// General-purpose assistant.
    General,
}

impl fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ingres => "ingres",
            Self::General => "general",
        })
    }
}

impl std::str::FromStr for PersonaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ingres" | "db" | "database" => Ok(Self::Ingres),
            "general" => Ok(Self::General),
            other => Err(format!("unknown persona '{other}' (expected ingres or general)")),
        }
    }
}

/// `[persona]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PersonaConfig {
    pub default: PersonaKind,
}

/// How much of the transcript is sent with each request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HistoryConfig {
    /// Resend every turn (no truncation).
    #[default]
    Full,
    /// Send the seed plus the most recent N turns.
    LastTurns(usize),
}

/// `[session]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Assistant greeting seeded into a fresh transcript. `None` starts empty.
    pub greeting: Option<String>,
    pub history: HistoryConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: Some(
                "Hello! I am your INGRES virtual assistant. How can I help you?".into(),
            ),
            history: HistoryConfig::Full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_aliases_parse() {
        assert_eq!("db".parse::<PersonaKind>(), Ok(PersonaKind::Ingres));
        assert_eq!("GENERAL".parse::<PersonaKind>(), Ok(PersonaKind::General));
        assert!("pirate".parse::<PersonaKind>().is_err());
    }

    #[test]
    fn history_full_is_a_plain_string_in_toml() {
        let config: SessionConfig = toml::from_str(r#"history = "full""#).unwrap();
        assert_eq!(config.history, HistoryConfig::Full);
    }

    #[test]
    fn history_last_turns_is_a_table_in_toml() {
        let config: SessionConfig = toml::from_str("history = { last_turns = 6 }").unwrap();
        assert_eq!(config.history, HistoryConfig::LastTurns(6));
    }

    #[test]
    fn default_greeting_is_present() {
        let config = SessionConfig::default();
        assert!(config.greeting.unwrap().contains("INGRES"));
    }
}
