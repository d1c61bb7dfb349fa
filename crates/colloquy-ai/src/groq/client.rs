//! Groq client struct, request building, and response parsing.

use crate::http::build_http_client;
use crate::{AiError, Completion, CompletionRequest, Role, TokenUsage};

use super::config::GroqConfig;

/// Groq chat-completion client.
pub struct GroqClient {
    pub(crate) config: GroqConfig,
    pub(crate) http: reqwest::Client,
}

impl GroqClient {
    pub fn new(config: GroqConfig) -> Result<Self, AiError> {
        let http = build_http_client(config.timeout)?;
        Ok(Self { config, http })
    }

    pub(crate) fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Build the JSON body: the system instruction first, then every turn.
    pub(crate) fn build_request_body(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> serde_json::Value {
        let mut messages = Vec::with_capacity(request.turns.len() + 1);
        messages.push(serde_json::json!({
            "role": "system",
            "content": request.system_instruction,
        }));
        for turn in &request.turns {
            let role = match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            messages.push(serde_json::json!({
                "role": role,
                "content": turn.content,
            }));
        }

        let sampling = &self.config.sampling;
        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": sampling.temperature,
            "top_p": sampling.top_p,
            "max_tokens": sampling.max_tokens,
            "stream": stream,
        })
    }

    /// Parse a non-streaming response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<Completion, AiError> {
        let choice = json["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .ok_or_else(|| AiError::ParseError("no choices in response".to_string()))?;

        let content = choice["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(Completion {
            content,
            usage: parse_usage(&json["usage"]),
        })
    }
}

/// OpenAI-style `usage` object; missing fields count as zero.
pub(crate) fn parse_usage(usage: &serde_json::Value) -> TokenUsage {
    TokenUsage {
        input_tokens: usage["prompt_tokens"].as_u64().unwrap_or(0),
        output_tokens: usage["completion_tokens"].as_u64().unwrap_or(0),
    }
}
