//! Gemini API client configuration.

use std::time::Duration;

use crate::credentials::ApiKey;
use crate::SamplingParams;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client configuration. The key's `Debug` output is redacted.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: ApiKey,
    pub model: String,
    pub base_url: String,
    pub sampling: SamplingParams,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            model: "gemini-2.0-flash".to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            sampling: SamplingParams::default(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
