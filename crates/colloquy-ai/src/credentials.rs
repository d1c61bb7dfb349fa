//! API key resolution.
//!
//! Resolution order:
//! 1. Explicit key (command line or `/key`)
//! 2. `provider.api_key` from the config file
//! 3. Environment variables for the provider
//! 4. `secrets.toml`
//! 5. `provider.fallback_api_key`
//!
//! The first key found is trimmed and checked against the provider's key
//! format before any network call is made.

use std::fmt;
use std::sync::LazyLock;

use colloquy_common::ConfigError;
use colloquy_config::SecretsStore;
use regex::Regex;
use tracing::debug;

use crate::ProviderKind;

static GROQ_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^gsk_[A-Za-z0-9]+$").unwrap());

static GEMINI_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^AIza[0-9A-Za-z_\-]+$").unwrap());

/// Characters of a rejected key echoed back in the diagnostic.
const SHOWN_PREFIX_CHARS: usize = 5;

/// A validated API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key without format checks (tests and pre-validated input).
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Where a resolved key came from, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Explicit,
    Config,
    Environment,
    Secrets,
    Fallback,
}

/// The places a key may be found, in priority order.
pub struct CredentialSources<'a> {
    pub explicit: Option<&'a str>,
    pub configured: Option<&'a str>,
    pub env: &'a dyn Fn(&str) -> Option<String>,
    pub secrets: &'a SecretsStore,
    pub fallback: Option<&'a str>,
}

impl<'a> CredentialSources<'a> {
    /// Sources backed by the real process environment.
    pub fn with_process_env(secrets: &'a SecretsStore) -> Self {
        Self {
            explicit: None,
            configured: None,
            env: &process_env,
            secrets,
            fallback: None,
        }
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Variable names checked in the environment and the secrets store.
pub fn key_names(kind: ProviderKind) -> &'static [&'static str] {
    match kind {
        ProviderKind::Groq => &["GROQ_API_KEY", "groq_api_key"],
        ProviderKind::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY", "gemini_api_key"],
    }
}

/// Required key prefix for a provider.
pub fn expected_prefix(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Groq => "gsk_",
        ProviderKind::Gemini => "AIza",
    }
}

/// Find and validate the API key for `kind`.
pub fn resolve_api_key(
    kind: ProviderKind,
    sources: &CredentialSources<'_>,
) -> Result<ApiKey, ConfigError> {
    let (raw, source) = find_key(kind, sources).ok_or_else(|| ConfigError::MissingCredential {
        provider: kind.display_name().to_string(),
        checked: key_names(kind).join(", "),
    })?;
    debug!(provider = %kind, source = ?source, "resolved API key");
    validate_key(kind, &raw)
}

/// Check a key's format without looking it up.
pub fn validate_key(kind: ProviderKind, raw: &str) -> Result<ApiKey, ConfigError> {
    let cleaned = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    let re = match kind {
        ProviderKind::Groq => &*GROQ_KEY_RE,
        ProviderKind::Gemini => &*GEMINI_KEY_RE,
    };
    if !re.is_match(cleaned) {
        return Err(ConfigError::InvalidCredential {
            provider: kind.display_name().to_string(),
            seen: cleaned.chars().take(SHOWN_PREFIX_CHARS).collect(),
            expected: expected_prefix(kind).to_string(),
        });
    }
    Ok(ApiKey(cleaned.to_string()))
}

fn find_key(kind: ProviderKind, sources: &CredentialSources<'_>) -> Option<(String, KeySource)> {
    let present = |v: Option<&str>| v.filter(|s| !s.trim().is_empty()).map(str::to_string);

    if let Some(key) = present(sources.explicit) {
        return Some((key, KeySource::Explicit));
    }
    if let Some(key) = present(sources.configured) {
        return Some((key, KeySource::Config));
    }
    for name in key_names(kind) {
        if let Some(key) = present((sources.env)(name).as_deref()) {
            return Some((key, KeySource::Environment));
        }
    }
    for name in key_names(kind) {
        if let Some(key) = present(sources.secrets.get(name)) {
            return Some((key, KeySource::Secrets));
        }
    }
    present(sources.fallback).map(|key| (key, KeySource::Fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn sources<'a>(
        env: &'a dyn Fn(&str) -> Option<String>,
        secrets: &'a SecretsStore,
    ) -> CredentialSources<'a> {
        CredentialSources {
            explicit: None,
            configured: None,
            env,
            secrets,
            fallback: None,
        }
    }

    #[test]
    fn explicit_key_wins() {
        let env = env_from(&[("GROQ_API_KEY", "gsk_fromenv")]);
        let secrets = SecretsStore::new();
        let mut s = sources(&env, &secrets);
        s.explicit = Some("gsk_explicit");
        s.configured = Some("gsk_config");

        let key = resolve_api_key(ProviderKind::Groq, &s).unwrap();
        assert_eq!(key.expose(), "gsk_explicit");
    }

    #[test]
    fn environment_beats_secrets_and_fallback() {
        let env = env_from(&[("groq_api_key", "gsk_lower")]);
        let secrets = SecretsStore::from_pairs([("GROQ_API_KEY", "gsk_secret")]);
        let mut s = sources(&env, &secrets);
        s.fallback = Some("gsk_fallback");

        let key = resolve_api_key(ProviderKind::Groq, &s).unwrap();
        assert_eq!(key.expose(), "gsk_lower");
    }

    #[test]
    fn uppercase_env_name_checked_first() {
        let env = env_from(&[("groq_api_key", "gsk_lower"), ("GROQ_API_KEY", "gsk_upper")]);
        let secrets = SecretsStore::new();
        let key = resolve_api_key(ProviderKind::Groq, &sources(&env, &secrets)).unwrap();
        assert_eq!(key.expose(), "gsk_upper");
    }

    #[test]
    fn secrets_then_fallback() {
        let env = env_from(&[]);
        let secrets = SecretsStore::from_pairs([("GEMINI_API_KEY", "AIzaFromSecrets")]);
        let key = resolve_api_key(ProviderKind::Gemini, &sources(&env, &secrets)).unwrap();
        assert_eq!(key.expose(), "AIzaFromSecrets");

        let empty = SecretsStore::new();
        let mut s = sources(&env, &empty);
        s.fallback = Some("AIzaFallback");
        let key = resolve_api_key(ProviderKind::Gemini, &s).unwrap();
        assert_eq!(key.expose(), "AIzaFallback");
    }

    #[test]
    fn blank_values_are_skipped() {
        let env = env_from(&[("GROQ_API_KEY", "   ")]);
        let secrets = SecretsStore::from_pairs([("GROQ_API_KEY", "gsk_secret")]);
        let mut s = sources(&env, &secrets);
        s.explicit = Some("");
        let key = resolve_api_key(ProviderKind::Groq, &s).unwrap();
        assert_eq!(key.expose(), "gsk_secret");
    }

    #[test]
    fn nothing_found_is_missing_credential() {
        let env = env_from(&[]);
        let secrets = SecretsStore::new();
        let err = resolve_api_key(ProviderKind::Groq, &sources(&env, &secrets)).unwrap_err();
        match err {
            ConfigError::MissingCredential { provider, checked } => {
                assert_eq!(provider, "Groq");
                assert!(checked.contains("GROQ_API_KEY"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wrong_prefix_is_rejected_with_short_preview() {
        let err = validate_key(ProviderKind::Groq, "sk-proj-abcdefghijkl").unwrap_err();
        match err {
            ConfigError::InvalidCredential { seen, expected, .. } => {
                assert_eq!(seen, "sk-pr");
                assert_eq!(expected, "gsk_");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn surrounding_whitespace_and_quotes_are_stripped() {
        let key = validate_key(ProviderKind::Groq, "  \"gsk_abc123\"\n").unwrap();
        assert_eq!(key.expose(), "gsk_abc123");
    }

    #[test]
    fn embedded_space_is_rejected() {
        assert!(validate_key(ProviderKind::Groq, "gsk_abc def").is_err());
    }

    #[test]
    fn gemini_prefix_checked() {
        assert!(validate_key(ProviderKind::Gemini, "AIzaSyA-b_c9").is_ok());
        assert!(validate_key(ProviderKind::Gemini, "gsk_abc").is_err());
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("gsk_secret");
        assert_eq!(format!("{key:?}"), "ApiKey([REDACTED])");
    }

    #[test]
    #[serial_test::serial]
    fn process_env_sources_read_real_environment() {
        std::env::set_var("GEMINI_API_KEY", "AIzaProcessEnv");
        let secrets = SecretsStore::new();
        let key =
            resolve_api_key(ProviderKind::Gemini, &CredentialSources::with_process_env(&secrets))
                .unwrap();
        std::env::remove_var("GEMINI_API_KEY");
        assert_eq!(key.expose(), "AIzaProcessEnv");
    }
}
