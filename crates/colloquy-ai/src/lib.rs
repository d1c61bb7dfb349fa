//! Conversation engine for Colloquy.
//!
//! Provides:
//! - A `Session` that owns the transcript and drives one turn at a time
//! - Groq (OpenAI-compatible) and Gemini completion clients with SSE streaming
//! - Whisper transcription plus audio capture for voice input
//! - Credential resolution with provider-specific key checks

pub mod credentials;
pub mod gemini;
pub mod groq;
pub(crate) mod http;
pub mod persona;
pub mod provider;
pub mod session;
pub mod streaming;
pub mod usage;
pub mod voice;

use async_trait::async_trait;

pub use colloquy_config::schema::{HistoryConfig, PersonaKind, ProviderKind};
pub use credentials::{resolve_api_key, ApiKey, CredentialSources};
pub use gemini::{GeminiClient, GeminiConfig};
pub use groq::{GroqClient, GroqConfig};
pub use persona::Persona;
pub use provider::build_provider;
pub use session::{
    FailureCategory, Session, SessionError, TurnOutcome, TurnState, TurnUpdate, FALLBACK_REPLY,
};
pub use usage::UsageTracker;
pub use voice::{
    AudioSource, CaptureError, CapturedAudio, CommandRecorder, ListenLimits,
    TranscriptionProvider, VoiceOutcome, WavFileSource, WhisperClient, WhisperConfig,
};

/// A hosted model that answers chat requests.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError>;

    /// Stream the reply. `on_chunk` receives text fragments in arrival order;
    /// the returned `Completion` holds their concatenation.
    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
        on_chunk: &mut (dyn FnMut(String) + Send),
    ) -> Result<Completion, AiError>;
}

/// Who wrote a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 1.0,
            max_tokens: 1024,
        }
    }
}

/// Outbound request: persona instruction plus the conversation so far.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Model not found: {0}")]
    ModelNotFound(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}
