//! Turn submission for Session (blocking and streaming).

use colloquy_common::TurnId;
use tracing::{debug, info, warn};

use crate::voice::{
    capture_and_transcribe, AudioSource, ListenLimits, TranscriptionProvider, VoiceOutcome,
};
use crate::{AiError, Completion, CompletionProvider, Persona, Turn};

use super::manager::Session;
use super::types::{
    FailureCategory, SessionError, TurnOutcome, TurnState, TurnUpdate, FALLBACK_REPLY,
};

impl Session {
    /// Send `text` and wait for the full reply.
    ///
    /// Provider failures are not errors here: the fallback text is committed
    /// and the category comes back in `TurnOutcome::Failed`.
    pub async fn submit_turn(
        &mut self,
        text: &str,
        persona: &Persona,
        provider: &dyn CompletionProvider,
    ) -> Result<TurnOutcome, SessionError> {
        let turn_id = self.begin_turn(text)?;
        let request = self.build_request(persona);
        debug!(turn = %turn_id, model = provider.model(), turns = request.turns.len(), "sending request");

        let result = provider.complete(&request).await;
        Ok(self.finish_turn(&turn_id, provider.model(), result, String::new()))
    }

    /// Send `text` using the provider's streaming mode.
    ///
    /// `on_update` sees `AwaitingProvider`, then a growing partial reply, then
    /// one terminal update. If the stream breaks after some text arrived, that
    /// text is what gets committed.
    pub async fn submit_turn_streaming<F>(
        &mut self,
        text: &str,
        persona: &Persona,
        provider: &dyn CompletionProvider,
        mut on_update: F,
    ) -> Result<TurnOutcome, SessionError>
    where
        F: FnMut(TurnUpdate<'_>) + Send,
    {
        let turn_id = self.begin_turn(text)?;
        let request = self.build_request(persona);
        debug!(turn = %turn_id, model = provider.model(), turns = request.turns.len(), "sending streaming request");
        on_update(TurnUpdate::AwaitingProvider);

        let mut partial = String::new();
        let state = &mut self.state;
        let result = {
            let mut on_chunk = |delta: String| {
                if delta.is_empty() {
                    return;
                }
                *state = TurnState::Streaming;
                partial.push_str(&delta);
                on_update(TurnUpdate::Streaming {
                    delta: &delta,
                    partial: &partial,
                });
            };
            provider.complete_streaming(&request, &mut on_chunk).await
        };

        let outcome = self.finish_turn(&turn_id, provider.model(), result, partial);
        match &outcome {
            TurnOutcome::Completed { reply } => on_update(TurnUpdate::Complete { reply }),
            TurnOutcome::Failed { category, .. } => on_update(TurnUpdate::Failed { category }),
        }
        Ok(outcome)
    }

    /// Capture one utterance and transcribe it. Never touches the transcript.
    ///
    /// Only bad limits are an error; every capture or service problem comes
    /// back as a recoverable `VoiceOutcome`.
    pub async fn record_and_transcribe(
        &self,
        source: &dyn AudioSource,
        transcriber: &dyn TranscriptionProvider,
        limits: &ListenLimits,
    ) -> Result<VoiceOutcome, SessionError> {
        limits
            .validate()
            .map_err(SessionError::InvalidVoiceConfig)?;
        let outcome = capture_and_transcribe(source, transcriber, limits).await;
        debug!(session = %self.id, outcome = ?outcome, "voice input finished");
        Ok(outcome)
    }

    fn begin_turn(&mut self, text: &str) -> Result<TurnId, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        self.transcript.push(Turn::user(text));
        self.state = TurnState::AwaitingProvider;
        Ok(TurnId::new())
    }

    /// Commit exactly one assistant turn for the result of a provider call.
    fn finish_turn(
        &mut self,
        turn_id: &TurnId,
        model: &str,
        result: Result<Completion, AiError>,
        partial: String,
    ) -> TurnOutcome {
        let failure = match result {
            Ok(completion) if !completion.content.trim().is_empty() => {
                self.usage.record(model, &completion.usage);
                info!(
                    turn = %turn_id,
                    output_tokens = completion.usage.output_tokens,
                    "turn complete"
                );
                self.transcript.push(Turn::assistant(completion.content.clone()));
                self.state = TurnState::Complete;
                return TurnOutcome::Completed {
                    reply: completion.content,
                };
            }
            Ok(completion) => {
                self.usage.record(model, &completion.usage);
                AiError::ApiError("the model returned an empty reply".into())
            }
            Err(e) => e,
        };

        let category = FailureCategory::from_error(&failure, model);
        warn!(turn = %turn_id, error = %failure, partial_len = partial.len(), "turn failed");
        let committed = if partial.trim().is_empty() {
            FALLBACK_REPLY.to_string()
        } else {
            partial
        };
        self.transcript.push(Turn::assistant(committed.clone()));
        self.state = TurnState::Failed;
        TurnOutcome::Failed {
            category,
            committed,
        }
    }
}
