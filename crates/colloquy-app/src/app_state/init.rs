//! Startup: credential resolution, provider and voice construction.

use std::sync::Arc;

use colloquy_ai::credentials::CredentialSources;
use colloquy_ai::{
    build_provider, resolve_api_key, CommandRecorder, CompletionProvider, ListenLimits, Persona,
    ProviderKind, Session, WhisperClient, WhisperConfig,
};
use colloquy_common::{ColloquyError, Notice};
use colloquy_config::{ColloquyConfig, SecretsStore};
use tracing::{info, warn};

use super::core::{ColloquyApp, StartupOptions, VoiceInput};

impl ColloquyApp {
    /// Build the app. Any credential or provider problem here is fatal.
    ///
    /// Returns notices worth showing before the first prompt (for example
    /// why voice input is off).
    pub fn new(
        config: ColloquyConfig,
        secrets: SecretsStore,
        options: StartupOptions,
    ) -> Result<(Self, Vec<Notice>), ColloquyError> {
        let provider = create_provider(
            &config,
            &secrets,
            options.api_key.as_deref(),
            options.model.as_deref(),
        )?;

        let mut notices = Vec::new();
        let voice = match create_voice(&config, &secrets, options.api_key.as_deref()) {
            Ok(voice) => voice,
            Err(reason) => {
                warn!(%reason, "voice input disabled");
                notices.push(Notice::warning(format!("Voice input is off: {reason}")));
                None
            }
        };

        let session = Session::new()
            .with_greeting(config.session.greeting.clone().unwrap_or_default())
            .with_history(config.session.history);
        let persona = Persona::for_kind(options.persona.unwrap_or(config.persona.default));
        info!(
            session = %session.id(),
            provider = %provider.kind(),
            model = provider.model(),
            persona = %persona.kind,
            "session started"
        );

        let stream = config.provider.stream && !options.no_stream;
        Ok((
            Self {
                config,
                secrets,
                session,
                persona,
                provider,
                explicit_key: options.api_key,
                model_override: options.model,
                stream,
                voice,
            },
            notices,
        ))
    }

    /// Re-resolve the key and rebuild the client after `/key` or `/model`.
    ///
    /// On failure the current provider stays in place.
    pub(super) fn rebuild_provider(
        &mut self,
        explicit_key: Option<String>,
        model: Option<String>,
    ) -> Result<(), ColloquyError> {
        let provider = create_provider(
            &self.config,
            &self.secrets,
            explicit_key.as_deref(),
            model.as_deref(),
        )?;
        self.provider = provider;
        self.explicit_key = explicit_key;
        self.model_override = model;
        Ok(())
    }
}

fn create_provider(
    config: &ColloquyConfig,
    secrets: &SecretsStore,
    explicit_key: Option<&str>,
    model: Option<&str>,
) -> Result<Arc<dyn CompletionProvider>, ColloquyError> {
    let mut sources = CredentialSources::with_process_env(secrets);
    sources.explicit = explicit_key;
    sources.configured = config.provider.api_key.as_deref();
    sources.fallback = config.provider.fallback_api_key.as_deref();

    let key = resolve_api_key(config.provider.kind, &sources)?;
    build_provider(&config.provider, key, model).map_err(|e| ColloquyError::Ai(e.to_string()))
}

/// Voice uses the Groq-hosted Whisper endpoint, so it needs a Groq key even
/// when chatting through another provider. `Ok(None)` means disabled in config.
fn create_voice(
    config: &ColloquyConfig,
    secrets: &SecretsStore,
    explicit_key: Option<&str>,
) -> Result<Option<VoiceInput>, String> {
    if !config.voice.enabled {
        return Ok(None);
    }

    let shares_key = config.provider.kind == ProviderKind::Groq;
    let mut sources = CredentialSources::with_process_env(secrets);
    sources.explicit = explicit_key.filter(|_| shares_key);
    sources.configured = config
        .voice
        .api_key
        .as_deref()
        .or_else(|| config.provider.api_key.as_deref().filter(|_| shares_key));
    sources.fallback = config
        .provider
        .fallback_api_key
        .as_deref()
        .filter(|_| shares_key);

    let key = resolve_api_key(ProviderKind::Groq, &sources).map_err(|e| e.to_string())?;
    let transcriber = WhisperClient::new(WhisperConfig::from_voice_config(key, &config.voice))
        .map_err(|e| e.to_string())?;
    let recorder = CommandRecorder::from_config(&config.voice).map_err(|e| e.to_string())?;

    Ok(Some(VoiceInput {
        recorder,
        transcriber,
        limits: ListenLimits::from_config(&config.voice),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_ai::PersonaKind;

    fn options(key: &str) -> StartupOptions {
        StartupOptions {
            api_key: Some(key.into()),
            ..Default::default()
        }
    }

    #[test]
    fn explicit_key_builds_groq_session() {
        let mut config = ColloquyConfig::default();
        config.voice.enabled = false;
        let (app, notices) =
            ColloquyApp::new(config, SecretsStore::new(), options("gsk_cli")).unwrap();
        assert!(notices.is_empty());
        assert_eq!(app.model(), "llama-3.3-70b-versatile");
        assert_eq!(app.persona.kind, PersonaKind::Ingres);
        assert_eq!(app.session.transcript().len(), 1);
        assert!(app.voice.is_none());
    }

    #[test]
    fn malformed_key_is_fatal() {
        let err = ColloquyApp::new(
            ColloquyConfig::default(),
            SecretsStore::new(),
            options("sk-wrong-vendor"),
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("sk-wr"));
    }

    #[test]
    fn cli_overrides_persona_and_streaming() {
        let mut config = ColloquyConfig::default();
        config.voice.enabled = false;
        let opts = StartupOptions {
            api_key: Some("gsk_cli".into()),
            model: Some("llama-3.1-8b-instant".into()),
            persona: Some(PersonaKind::General),
            no_stream: true,
        };
        let (app, _) = ColloquyApp::new(config, SecretsStore::new(), opts).unwrap();
        assert_eq!(app.persona.kind, PersonaKind::General);
        assert_eq!(app.model(), "llama-3.1-8b-instant");
        assert!(!app.stream);
    }

    #[test]
    fn voice_reuses_groq_key() {
        let config = ColloquyConfig::default();
        let (app, notices) =
            ColloquyApp::new(config, SecretsStore::new(), options("gsk_cli")).unwrap();
        assert!(notices.is_empty());
        assert!(app.voice.is_some());
    }

    #[test]
    #[serial_test::serial]
    fn gemini_without_groq_key_disables_voice() {
        std::env::remove_var("GROQ_API_KEY");
        std::env::remove_var("groq_api_key");
        let mut config = ColloquyConfig::default();
        config.provider.kind = ProviderKind::Gemini;
        let (app, notices) =
            ColloquyApp::new(config, SecretsStore::new(), options("AIzaGemini")).unwrap();
        assert!(app.voice.is_none());
        assert_eq!(notices.len(), 1);
        assert!(notices[0].text.contains("GROQ_API_KEY"));
    }

    #[test]
    fn rebuild_keeps_old_provider_on_bad_key() {
        let mut config = ColloquyConfig::default();
        config.voice.enabled = false;
        let (mut app, _) =
            ColloquyApp::new(config, SecretsStore::new(), options("gsk_first")).unwrap();

        assert!(app.rebuild_provider(Some("bogus".into()), None).is_err());
        assert_eq!(app.explicit_key.as_deref(), Some("gsk_first"));

        app.rebuild_provider(Some("gsk_second".into()), Some("mixtral-8x7b-32768".into()))
            .unwrap();
        assert_eq!(app.model(), "mixtral-8x7b-32768");
        assert_eq!(app.explicit_key.as_deref(), Some("gsk_second"));
    }
}
