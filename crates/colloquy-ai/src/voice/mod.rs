//! Voice input: audio capture plus speech-to-text.
//!
//! Capture and recognition are separate seams. An `AudioSource` produces a
//! WAV buffer (live recorder or a pre-recorded file) and a
//! `TranscriptionProvider` turns it into text. `capture_and_transcribe`
//! folds every failure of either into a recoverable `VoiceOutcome`.

mod file_source;
mod recorder;
pub mod wav;
mod whisper;

use std::time::Duration;

use async_trait::async_trait;
use colloquy_common::Notice;
use colloquy_config::schema::VoiceConfig;
use tracing::{debug, warn};

use crate::AiError;

pub use file_source::WavFileSource;
pub use recorder::CommandRecorder;
pub use wav::WavInfo;
pub use whisper::{WhisperClient, WhisperConfig, GROQ_AUDIO_API_BASE};

/// How long to wait for speech and how long one phrase may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenLimits {
    pub listen_timeout: Duration,
    pub phrase_time_limit: Duration,
}

impl ListenLimits {
    pub fn new(listen_timeout: Duration, phrase_time_limit: Duration) -> Self {
        Self {
            listen_timeout,
            phrase_time_limit,
        }
    }

    pub fn from_config(config: &VoiceConfig) -> Self {
        Self::new(
            Duration::from_secs(u64::from(config.listen_timeout_secs)),
            Duration::from_secs(u64::from(config.phrase_time_limit_secs)),
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.listen_timeout.is_zero() {
            return Err("listen timeout must be greater than zero".into());
        }
        if self.phrase_time_limit.is_zero() {
            return Err("phrase time limit must be greater than zero".into());
        }
        Ok(())
    }

    /// Upper bound on a whole capture: wait for speech, then one phrase.
    pub fn total(&self) -> Duration {
        self.listen_timeout.saturating_add(self.phrase_time_limit)
    }
}

impl Default for ListenLimits {
    fn default() -> Self {
        Self::from_config(&VoiceConfig::default())
    }
}

/// One recorded utterance ready for upload.
#[derive(Debug, Clone)]
pub struct CapturedAudio {
    pub bytes: Vec<u8>,
    /// Name sent in the multipart form; the extension picks the MIME type.
    pub filename: String,
    pub info: WavInfo,
}

impl CapturedAudio {
    /// Validate a WAV buffer. Too-short recordings count as no speech.
    pub fn from_wav(bytes: Vec<u8>, filename: impl Into<String>) -> Result<Self, CaptureError> {
        let info = wav::parse(&bytes)?;
        if info.is_too_short() {
            debug!(duration_ms = info.duration().as_millis() as u64, "recording too short");
            return Err(CaptureError::NoSpeech);
        }
        Ok(Self {
            bytes,
            filename: filename.into(),
            info,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("no speech detected")]
    NoSpeech,
    #[error("invalid audio: {0}")]
    InvalidAudio(String),
    /// A pre-recorded file could not be read.
    #[error("could not read {path}: {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces audio for one utterance.
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn capture(&self, limits: &ListenLimits) -> Result<CapturedAudio, CaptureError>;
}

/// Speech-to-text service.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(&self, audio: &CapturedAudio) -> Result<String, AiError>;
}

/// Result of one voice input attempt. Only `Transcribed` carries input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    Transcribed(String),
    NoSpeech,
    Unintelligible,
    DeviceUnavailable(String),
    /// Path and reason for an audio file that could not be read.
    FileUnreadable { path: String, reason: String },
    ServiceFailed(String),
}

impl VoiceOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Transcribed(text) => Some(text),
            _ => None,
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            Self::Transcribed(text) => Notice::success(format!("You said: {text}")),
            Self::NoSpeech => Notice::warning("No speech detected. Please try again."),
            Self::Unintelligible => {
                Notice::warning("Sorry, I could not understand the audio. Please speak clearly.")
            }
            Self::DeviceUnavailable(reason) => {
                Notice::error(format!("No microphone available: {reason}"))
            }
            Self::FileUnreadable { path, reason } => {
                Notice::error(format!("Could not read audio file '{path}': {reason}"))
            }
            Self::ServiceFailed(reason) => Notice::error(format!(
                "Could not request results from the transcription service; {reason}"
            )),
        }
    }
}

/// Capture one utterance and transcribe it, mapping every failure to an outcome.
pub async fn capture_and_transcribe(
    source: &dyn AudioSource,
    transcriber: &dyn TranscriptionProvider,
    limits: &ListenLimits,
) -> VoiceOutcome {
    let audio = match source.capture(limits).await {
        Ok(audio) => audio,
        Err(CaptureError::NoSpeech) => return VoiceOutcome::NoSpeech,
        Err(CaptureError::InvalidAudio(reason)) => {
            warn!(%reason, "captured audio is not usable");
            return VoiceOutcome::Unintelligible;
        }
        Err(CaptureError::DeviceUnavailable(reason)) => {
            warn!(%reason, "audio device unavailable");
            return VoiceOutcome::DeviceUnavailable(reason);
        }
        Err(CaptureError::FileUnreadable { path, source }) => {
            warn!(%path, error = %source, "audio file unreadable");
            return VoiceOutcome::FileUnreadable {
                path,
                reason: source.to_string(),
            };
        }
        Err(CaptureError::Io(e)) => {
            warn!(error = %e, "audio capture failed");
            return VoiceOutcome::DeviceUnavailable(e.to_string());
        }
    };

    debug!(
        bytes = audio.bytes.len(),
        duration_ms = audio.info.duration().as_millis() as u64,
        "transcribing captured audio"
    );
    match transcriber.transcribe(&audio).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                VoiceOutcome::Unintelligible
            } else {
                VoiceOutcome::Transcribed(text.to_string())
            }
        }
        Err(e) => {
            warn!(error = %e, "transcription request failed");
            VoiceOutcome::ServiceFailed(e.to_string())
        }
    }
}
