//! Voice input configuration types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder in `recorder_command` replaced with the phrase limit in seconds.
pub const PHRASE_LIMIT_PLACEHOLDER: &str = "{phrase_limit}";

/// `[voice]` section.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub enabled: bool,
    /// Program plus arguments that records from the default input device
    /// and writes a WAV stream to stdout.
    pub recorder_command: Vec<String>,
    /// How long to wait for speech to start (valid range: 1-60).
    pub listen_timeout_secs: u32,
    /// Maximum length of one phrase (valid range: 1-120).
    pub phrase_time_limit_secs: u32,
    /// Transcription model.
    pub model: String,
    pub language: Option<String>,
    /// Override of the transcription API base URL.
    pub base_url: Option<String>,
    /// Key for the transcription service; falls back to the Groq lookup chain.
    pub api_key: Option<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        let recorder = [
            "sox", "-q", "-d", "-t", "wav", "-r", "16000", "-c", "1", "-b", "16", "-",
            "silence", "1", "0.1", "1%", "1", "1.5", "1%", "trim", "0",
            PHRASE_LIMIT_PLACEHOLDER,
        ];
        Self {
            enabled: true,
            recorder_command: recorder.iter().map(|s| s.to_string()).collect(),
            listen_timeout_secs: 5,
            phrase_time_limit_secs: 10,
            model: "whisper-large-v3".into(),
            language: None,
            base_url: None,
            api_key: None,
        }
    }
}

impl fmt::Debug for VoiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceConfig")
            .field("enabled", &self.enabled)
            .field("recorder_command", &self.recorder_command)
            .field("listen_timeout_secs", &self.listen_timeout_secs)
            .field("phrase_time_limit_secs", &self.phrase_time_limit_secs)
            .field("model", &self.model)
            .field("language", &self.language)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
