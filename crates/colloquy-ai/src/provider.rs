//! Provider selection: builds the configured completion client.

use std::sync::Arc;
use std::time::Duration;

use colloquy_config::schema::ProviderConfig;
use tracing::info;

use crate::credentials::ApiKey;
use crate::{
    AiError, CompletionProvider, GeminiClient, GeminiConfig, GroqClient, GroqConfig, ProviderKind,
    SamplingParams,
};

impl From<&ProviderConfig> for SamplingParams {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        }
    }
}

/// Build the completion client named by `config.kind`.
///
/// `model` overrides the configured model (used when the user switches
/// model mid-session); the key must already be resolved for `config.kind`.
pub fn build_provider(
    config: &ProviderConfig,
    api_key: ApiKey,
    model: Option<&str>,
) -> Result<Arc<dyn CompletionProvider>, AiError> {
    let model = model
        .map(str::to_string)
        .unwrap_or_else(|| config.model_or_default());
    let sampling = SamplingParams::from(config);
    let timeout = Duration::from_secs(u64::from(config.request_timeout_secs));
    let base_url = config
        .base_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    info!(provider = %config.kind, model = %model, "initializing completion provider");

    let provider: Arc<dyn CompletionProvider> = match config.kind {
        ProviderKind::Groq => {
            let mut groq = GroqConfig::new(api_key)
                .with_model(model)
                .with_sampling(sampling)
                .with_timeout(timeout);
            if let Some(url) = base_url {
                groq = groq.with_base_url(url);
            }
            Arc::new(GroqClient::new(groq)?)
        }
        ProviderKind::Gemini => {
            let mut gemini = GeminiConfig::new(api_key)
                .with_model(model)
                .with_sampling(sampling)
                .with_timeout(timeout);
            if let Some(url) = base_url {
                gemini = gemini.with_base_url(url);
            }
            Arc::new(GeminiClient::new(gemini)?)
        }
    };
    Ok(provider)
}
