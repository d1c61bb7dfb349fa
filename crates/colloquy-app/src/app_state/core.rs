//! ColloquyApp struct definition.

use std::sync::Arc;

use colloquy_ai::{
    CommandRecorder, CompletionProvider, ListenLimits, Persona, Session, WhisperClient,
};
use colloquy_config::{ColloquyConfig, SecretsStore};

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub persona: Option<colloquy_ai::PersonaKind>,
    pub no_stream: bool,
}

/// Everything needed to record and transcribe one utterance.
pub(super) struct VoiceInput {
    pub recorder: CommandRecorder,
    pub transcriber: WhisperClient,
    pub limits: ListenLimits,
}

/// The interactive application.
pub struct ColloquyApp {
    pub(super) config: ColloquyConfig,
    pub(super) secrets: SecretsStore,
    pub(super) session: Session,
    pub(super) persona: Persona,
    pub(super) provider: Arc<dyn CompletionProvider>,
    /// Key given with `--api-key` or `/key`; wins over every other source.
    pub(super) explicit_key: Option<String>,
    /// Model chosen with `--model` or `/model`.
    pub(super) model_override: Option<String>,
    pub(super) stream: bool,
    /// `None` when voice is disabled or no transcription key was found.
    pub(super) voice: Option<VoiceInput>,
}

impl ColloquyApp {
    pub fn model(&self) -> &str {
        self.provider.model()
    }
}
