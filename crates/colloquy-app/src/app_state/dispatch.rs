//! Command dispatch: one typed line in, visible output out.

use std::ops::ControlFlow;
use std::path::Path;

use colloquy_ai::{
    AudioSource, Persona, TurnOutcome, TurnUpdate, VoiceOutcome, WavFileSource,
};
use colloquy_common::Notice;
use tracing::{debug, info};

use super::commands::Command;
use super::core::ColloquyApp;
use super::render;

impl ColloquyApp {
    /// Run one command. `Break` means the user asked to quit.
    pub(super) async fn dispatch(&mut self, command: Command) -> ControlFlow<()> {
        debug!(command = command.name(), "dispatch");
        match command {
            Command::Empty => {}
            Command::Message(text) => self.send(&text).await,
            Command::Help => render::print_line(&render::format_help()),
            Command::Reset => {
                self.session.reset();
                render::print_notice(&Notice::info("Conversation cleared."));
                self.print_transcript();
            }
            Command::Persona(kind) => {
                self.persona = Persona::for_kind(kind);
                info!(persona = %kind, "persona switched");
                render::print_notice(&Notice::success(format!(
                    "Now talking to the {}.",
                    self.persona.label
                )));
            }
            Command::Model(model) => {
                let key = self.explicit_key.clone();
                match self.rebuild_provider(key, Some(model)) {
                    Ok(()) => render::print_notice(&Notice::success(format!(
                        "Switched to model '{}'.",
                        self.model()
                    ))),
                    Err(e) => render::print_notice(&Notice::error(e.to_string())),
                }
            }
            Command::Key(key) => {
                let model = self.model_override.clone();
                match self.rebuild_provider(Some(key), model) {
                    Ok(()) => render::print_notice(&Notice::success("API key updated.")),
                    Err(e) => render::print_notice(&Notice::error(e.to_string())),
                }
            }
            Command::Voice(file) => self.voice(file.as_deref()).await,
            Command::History => {
                self.print_transcript();
                if let Some(note) = render::format_history_policy(self.session.history()) {
                    render::print_notice(&Notice::info(note));
                }
            }
            Command::Usage => render::print_line(&render::format_usage(self.session.usage())),
            Command::Config => render::print_line(&colloquy_config::config_to_json(&self.config)),
            Command::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    pub(super) fn print_transcript(&self) {
        for turn in self.session.transcript() {
            render::print_turn(turn, self.persona.label);
        }
    }

    async fn send(&mut self, text: &str) {
        let provider = self.provider.clone();
        let label = self.persona.label;

        let result = if self.stream {
            let mut streamed = false;
            let result = self
                .session
                .submit_turn_streaming(text, &self.persona, provider.as_ref(), |update| {
                    match update {
                        TurnUpdate::AwaitingProvider => {}
                        TurnUpdate::Streaming { delta, .. } => {
                            if !streamed {
                                render::begin_stream(label);
                                streamed = true;
                            }
                            render::print_delta(delta);
                        }
                        TurnUpdate::Complete { .. } | TurnUpdate::Failed { .. } => {
                            if streamed {
                                render::print_line("");
                            }
                        }
                    }
                })
                .await;
            // Nothing was shown yet if the stream failed before any text.
            if let Ok(TurnOutcome::Failed { committed, .. }) = &result {
                if !streamed {
                    render::print_line(&format!("{label}> {committed}"));
                }
            }
            result
        } else {
            let result = self
                .session
                .submit_turn(text, &self.persona, provider.as_ref())
                .await;
            if let Ok(outcome) = &result {
                render::print_line(&format!("{label}> {}", outcome.committed_text()));
            }
            result
        };

        match result {
            Ok(TurnOutcome::Completed { .. }) => {}
            Ok(TurnOutcome::Failed { category, .. }) => render::print_notice(&category.notice()),
            Err(e) => render::print_notice(&Notice::warning(e.to_string())),
        }
    }

    /// Capture speech (or read a WAV file), show what was heard and send it.
    async fn voice(&mut self, file: Option<&Path>) {
        let Some(voice) = self.voice.as_ref() else {
            render::print_notice(&Notice::warning(
                "Voice input is not available. Check the [voice] section and your Groq key.",
            ));
            return;
        };

        let file_source;
        let source: &dyn AudioSource = match file {
            Some(path) => {
                file_source = WavFileSource::from_path(path);
                &file_source
            }
            None => {
                render::print_notice(&Notice::info("Listening... speak now."));
                &voice.recorder
            }
        };

        let outcome = match self
            .session
            .record_and_transcribe(source, &voice.transcriber, &voice.limits)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                render::print_notice(&Notice::error(e.to_string()));
                return;
            }
        };

        render::print_notice(&outcome.notice());
        if let VoiceOutcome::Transcribed(text) = outcome {
            self.send(&text).await;
        }
    }
}
