//! CompletionProvider implementation for GeminiClient (complete + streaming).

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::http::{check_status, stream_error, transport_error};
use crate::streaming::{parse_sse_stream, SseEvent};
use crate::{AiError, Completion, CompletionProvider, CompletionRequest, ProviderKind, TokenUsage};

use super::client::{candidate_text, parse_usage, GeminiClient};

#[async_trait]
impl CompletionProvider for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError> {
        let body = self.build_request_body(request);

        debug!(model = %self.config.model, turns = request.turns.len(), "Gemini API request");

        let response = self
            .http
            .post(self.api_url(false))
            .header("x-goog-api-key", self.config.api_key.expose())
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
        let body = self.build_request_body(request);

        debug!(model = %self.config.model, turns = request.turns.len(), "Gemini API streaming request");

        let response = self
            .http
            .post(self.api_url(true))
            .header("x-goog-api-key", self.config.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response, &self.config.model).await?;

        let mut full_content = String::new();
        let mut usage = TokenUsage::default();
        let mut failure: Option<AiError> = None;
        // The last chunk of a finished reply carries a finishReason.
        let mut finished = false;

        parse_sse_stream(response, |event: SseEvent| {
            if failure.is_some() {
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
            if let Some(reason) = data["promptFeedback"]["blockReason"].as_str() {
                failure = Some(AiError::ApiError(format!("prompt blocked: {reason}")));
                return;
            }

            if let Some(candidate) = data["candidates"].as_array().and_then(|c| c.first()) {
                let chunk = candidate_text(candidate);
                if !chunk.is_empty() {
                    full_content.push_str(&chunk);
                    on_chunk(chunk);
                }
                if candidate["finishReason"].is_string() {
                    finished = true;
                }
            }

            if let Some(meta) = data.get("usageMetadata") {
                usage = parse_usage(meta);
            }
        })
        .await?;

        if let Some(err) = failure {
            return Err(err);
        }
        if !finished {
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
