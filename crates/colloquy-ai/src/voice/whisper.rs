//! Whisper speech-to-text over an OpenAI-compatible API.
//!
//! Defaults to Groq's hosted `whisper-large-v3`; any server exposing
//! `/audio/transcriptions` with multipart upload works.

use std::time::Duration;

use async_trait::async_trait;
use colloquy_config::schema::VoiceConfig;
use tracing::debug;

use crate::credentials::ApiKey;
use crate::http::{build_http_client, check_status, transport_error};
use crate::AiError;

use super::{CapturedAudio, TranscriptionProvider};

pub const GROQ_AUDIO_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Whisper client configuration. The key's `Debug` output is redacted.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    pub api_key: ApiKey,
    pub model: String,
    pub language: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl WhisperConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            model: "whisper-large-v3".to_string(),
            language: None,
            base_url: GROQ_AUDIO_API_BASE.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Model, language and base URL from `[voice]`; blank values keep defaults.
    pub fn from_voice_config(api_key: ApiKey, voice: &VoiceConfig) -> Self {
        let mut config = Self::new(api_key);
        if !voice.model.trim().is_empty() {
            config.model = voice.model.trim().to_string();
        }
        if let Some(lang) = voice.language.as_deref().filter(|l| !l.trim().is_empty()) {
            config = config.with_language(lang.trim());
        }
        if let Some(url) = voice.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        config
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Whisper speech-to-text client.
pub struct WhisperClient {
    config: WhisperConfig,
    http: reqwest::Client,
}

impl WhisperClient {
    pub fn new(config: WhisperConfig) -> Result<Self, AiError> {
        let http = build_http_client(config.timeout)?;
        Ok(Self { config, http })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn transcription_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

fn mime_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("webm") => "audio/webm",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        _ => "audio/wav",
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperClient {
    async fn transcribe(&self, audio: &CapturedAudio) -> Result<String, AiError> {
        debug!(
            model = %self.config.model,
            size = audio.bytes.len(),
            "Whisper transcription request"
        );

        let file_part = reqwest::multipart::Part::bytes(audio.bytes.clone())
            .file_name(audio.filename.clone())
            .mime_str(mime_for(&audio.filename))
            .map_err(|e| AiError::ApiError(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.config.model.clone())
            .text("response_format", "json");

        if let Some(ref lang) = self.config.language {
            form = form.text("language", lang.clone());
        }

        let response = self
            .http
            .post(self.transcription_url())
            .bearer_auth(self.config.api_key.expose())
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, &self.config.model).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        json["text"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| AiError::ParseError("no 'text' field in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::wav;

    fn audio() -> CapturedAudio {
        CapturedAudio::from_wav(wav::encode_pcm(16_000, 1, 16, &vec![0u8; 16_000]), "speech.wav")
            .unwrap()
    }

    fn client_for(url: &str) -> WhisperClient {
        WhisperClient::new(WhisperConfig::new(ApiKey::new("gsk_test")).with_base_url(url)).unwrap()
    }

    #[test]
    fn voice_config_overrides_apply() {
        let voice = VoiceConfig {
            model: "distil-whisper-large-v3-en".into(),
            language: Some("en".into()),
            base_url: Some("http://localhost:1234/v1/".into()),
            ..Default::default()
        };
        let config = WhisperConfig::from_voice_config(ApiKey::new("gsk_x"), &voice);
        assert_eq!(config.model, "distil-whisper-large-v3-en");
        assert_eq!(config.language.as_deref(), Some("en"));
        let client = WhisperClient::new(config).unwrap();
        assert_eq!(
            client.transcription_url(),
            "http://localhost:1234/v1/audio/transcriptions"
        );
    }

    #[test]
    fn debug_hides_key() {
        let config = WhisperConfig::new(ApiKey::new("gsk_secret"));
        assert!(!format!("{config:?}").contains("gsk_secret"));
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for("a.mp3"), "audio/mpeg");
        assert_eq!(mime_for("a.wav"), "audio/wav");
        assert_eq!(mime_for("noext"), "audio/wav");
    }

    #[tokio::test]
    async fn transcribe_returns_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/audio/transcriptions")
            .match_header("authorization", "Bearer gsk_test")
            .match_header(
                "content-type",
                mockito::Matcher::Regex("multipart/form-data".into()),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text":" What is a B-tree index?"}"#)
            .create_async()
            .await;

        let text = client_for(&server.url()).transcribe(&audio()).await.unwrap();
        assert_eq!(text, " What is a B-tree index?");
    }

    #[tokio::test]
    async fn transcribe_maps_status_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/audio/transcriptions")
            .with_status(401)
            .create_async()
            .await;

        let err = client_for(&server.url())
            .transcribe(&audio())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Authentication(_)));
    }

    #[tokio::test]
    async fn missing_text_field_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body(r#"{"segments":[]}"#)
            .create_async()
            .await;

        let err = client_for(&server.url())
            .transcribe(&audio())
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::ParseError(_)));
    }
}
