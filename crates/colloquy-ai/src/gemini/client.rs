//! Gemini API client struct, request building, and response parsing.

use crate::http::build_http_client;
use crate::{AiError, Completion, CompletionRequest, Role, TokenUsage};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = build_http_client(config.timeout)?;
        Ok(Self { config, http })
    }

    pub(crate) fn api_url(&self, stream: bool) -> String {
        let method = if stream {
            "streamGenerateContent?alt=sse"
        } else {
            "generateContent"
        };
        format!(
            "{}/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        // Gemini rejects conversations that open with a model turn, so a
        // seeded greeting is left out of the contents.
        let contents: Vec<_> = request
            .turns
            .iter()
            .skip_while(|turn| turn.role == Role::Assistant)
            .map(|turn| {
                let role = match turn.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": turn.content }]
                })
            })
            .collect();

        let sampling = &self.config.sampling;
        serde_json::json!({
            "systemInstruction": {
                "parts": [{ "text": request.system_instruction }]
            },
            "contents": contents,
            "generationConfig": {
                "temperature": sampling.temperature,
                "topP": sampling.top_p,
                "maxOutputTokens": sampling.max_tokens,
            }
        })
    }

    /// Parse a Gemini response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<Completion, AiError> {
        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            return Err(AiError::ApiError(format!("prompt blocked: {reason}")));
        }

        let first = json["candidates"]
            .as_array()
            .and_then(|candidates| candidates.first())
            .ok_or_else(|| AiError::ParseError("no candidates in response".to_string()))?;

        Ok(Completion {
            content: candidate_text(first),
            usage: parse_usage(&json["usageMetadata"]),
        })
    }
}

/// Concatenate the text parts of one candidate.
pub(crate) fn candidate_text(candidate: &serde_json::Value) -> String {
    candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default()
}

pub(crate) fn parse_usage(meta: &serde_json::Value) -> TokenUsage {
    TokenUsage {
        input_tokens: meta["promptTokenCount"].as_u64().unwrap_or(0),
        output_tokens: meta["candidatesTokenCount"].as_u64().unwrap_or(0),
    }
}
