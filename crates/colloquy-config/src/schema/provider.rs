//! Completion provider configuration types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which hosted completion API to talk to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible chat completions served by Groq.
    #[default]
    Groq,
    /// Google Gemini generative language API.
    Gemini,
}

impl ProviderKind {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Groq => "Groq",
            Self::Gemini => "Gemini",
        }
    }

    /// Model used when the config does not name one.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Groq => "llama-3.3-70b-versatile",
            Self::Gemini => "gemini-2.0-flash",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Groq => "groq",
            Self::Gemini => "gemini",
        })
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "gemini" => Ok(Self::Gemini),
            other => Err(format!("unknown provider '{other}' (expected groq or gemini)")),
        }
    }
}

/// `[provider]` section.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Model identifier; `None` uses the provider default.
    pub model: Option<String>,
    /// Explicit key. Takes precedence over environment and secrets.
    pub api_key: Option<String>,
    /// Last resort when no other source has a key.
    pub fallback_api_key: Option<String>,
    /// Override of the API base URL.
    pub base_url: Option<String>,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Nucleus sampling (valid range: 0.0-1.0).
    pub top_p: f64,
    /// Maximum output tokens (valid range: 1-32768).
    pub max_tokens: u32,
    pub stream: bool,
    /// Whole-request timeout in seconds (valid range: 1-600).
    pub request_timeout_secs: u32,
}

impl ProviderConfig {
    /// The configured model, or the provider default.
    pub fn model_or_default(&self) -> String {
        match self.model.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => self.kind.default_model().to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Groq,
            model: None,
            api_key: None,
            fallback_api_key: None,
            base_url: None,
            temperature: 0.7,
            top_p: 1.0,
            max_tokens: 1024,
            stream: true,
            request_timeout_secs: 120,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |k: &Option<String>| k.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .field("fallback_api_key", &redact(&self.fallback_api_key))
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .field("stream", &self.stream)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
