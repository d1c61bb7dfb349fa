//! CompletionProvider implementation for GroqClient (complete + streaming).

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::http::{check_status, stream_error, transport_error};
use crate::streaming::{parse_sse_stream, SseEvent};
use crate::{AiError, Completion, CompletionProvider, CompletionRequest, ProviderKind, TokenUsage};

use super::client::{parse_usage, GroqClient};

#[async_trait]
impl CompletionProvider for GroqClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Groq
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError> {
        let body = self.build_request_body(request, false);

        debug!(model = %self.config.model, turns = request.turns.len(), "Groq API request");

        let response = self
            .http
            .post(self.chat_url())
            .bearer_auth(self.config.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, &self.config.model).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(json)
    }

    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
        on_chunk: &mut (dyn FnMut(String) + Send),
    ) -> Result<Completion, AiError> {
        let body = self.build_request_body(request, true);

        debug!(model = %self.config.model, turns = request.turns.len(), "Groq API streaming request");

        let response = self
            .http
            .post(self.chat_url())
            .bearer_auth(self.config.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, &self.config.model).await?;

        let mut full_content = String::new();
        let mut usage = TokenUsage::default();
        let mut failure: Option<AiError> = None;
        let mut saw_done = false;

        parse_sse_stream(response, |event: SseEvent| {
            if saw_done || failure.is_some() {
                return;
            }
            if event.is_done() {
                saw_done = true;
                return;
            }
            let Ok(data) = serde_json::from_str::<serde_json::Value>(&event.data) else {
                warn!("skipping unparseable stream event");
                return;
            };

            if let Some(err) = data.get("error") {
                failure = Some(stream_error(err, &self.config.model));
                return;
            }

            if let Some(text) = data["choices"][0]["delta"]["content"].as_str() {
                if !text.is_empty() {
                    full_content.push_str(text);
                    on_chunk(text.to_string());
                }
            }

            // Groq reports usage under `x_groq` on the last chunk; plain
            // OpenAI-compatible servers use a top-level `usage`.
            for u in [&data["x_groq"]["usage"], &data["usage"]] {
                if u.is_object() {
                    usage = parse_usage(u);
                }
            }
        })
        .await?;

        if let Some(err) = failure {
            return Err(err);
        }
        if !saw_done {
            return Err(AiError::NetworkError(
                "stream ended before completion".into(),
            ));
        }

        Ok(Completion {
            content: full_content,
            usage,
        })
    }
}
