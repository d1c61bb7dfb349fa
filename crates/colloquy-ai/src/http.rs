//! HTTP plumbing shared by the provider clients.

use std::time::Duration;

use reqwest::StatusCode;

use crate::AiError;

/// Longest slice of an error body kept in an `AiError`.
const ERROR_BODY_LIMIT: usize = 200;

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AiError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()
        .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn transport_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(e.to_string())
    }
}

/// Pass successful responses through; turn anything else into a categorized error.
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_for_status(status, &body, model))
}

pub(crate) fn error_for_status(status: StatusCode, body: &str, model: &str) -> AiError {
    let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiError::Authentication(snippet),
        StatusCode::NOT_FOUND => AiError::ModelNotFound(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited,
        // Gemini answers a bad key with 400 rather than 401.
        StatusCode::BAD_REQUEST
            if body.contains("API_KEY_INVALID") || body.contains("API key not valid") =>
        {
            AiError::Authentication(snippet)
        }
        StatusCode::BAD_REQUEST if body.contains("model_not_found") => {
            AiError::ModelNotFound(model.to_string())
        }
        _ => AiError::ApiError(format!("HTTP {status}: {snippet}")),
    }
}

/// Map an `error` object that arrives inside an otherwise successful stream.
///
/// Groq tags it with `type`/`code`, Gemini with a numeric `code` and a `status`.
pub(crate) fn stream_error(error: &serde_json::Value, model: &str) -> AiError {
    let message = error["message"]
        .as_str()
        .unwrap_or("stream reported an error")
        .to_string();
    let tags: Vec<&str> = ["type", "code", "status"]
        .iter()
        .filter_map(|field| error[*field].as_str())
        .collect();

    if error["code"].as_u64() == Some(429)
        || tags
            .iter()
            .any(|t| matches!(*t, "rate_limit_exceeded" | "RESOURCE_EXHAUSTED"))
    {
        AiError::RateLimited
    } else if error["code"].as_u64() == Some(404)
        || tags.iter().any(|t| matches!(*t, "model_not_found" | "NOT_FOUND"))
    {
        AiError::ModelNotFound(model.to_string())
    } else {
        AiError::ApiError(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_map_to_authentication() {
        let err = error_for_status(StatusCode::UNAUTHORIZED, "invalid_api_key", "m");
        assert!(matches!(err, AiError::Authentication(_)));
        let err = error_for_status(StatusCode::FORBIDDEN, "", "m");
        assert!(matches!(err, AiError::Authentication(_)));
    }

    #[test]
    fn not_found_carries_model() {
        let err = error_for_status(StatusCode::NOT_FOUND, "{}", "llama-x");
        match err {
            AiError::ModelNotFound(model) => assert_eq!(model, "llama-x"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        let err = error_for_status(StatusCode::TOO_MANY_REQUESTS, "slow down", "m");
        assert!(matches!(err, AiError::RateLimited));
    }

    #[test]
    fn gemini_bad_key_400_is_authentication() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#;
        let err = error_for_status(StatusCode::BAD_REQUEST, body, "gemini-2.0-flash");
        assert!(matches!(err, AiError::Authentication(_)));
    }

    #[test]
    fn model_not_found_code_in_400_body() {
        let body = r#"{"error":{"code":"model_not_found"}}"#;
        let err = error_for_status(StatusCode::BAD_REQUEST, body, "old-model");
        assert!(matches!(err, AiError::ModelNotFound(_)));
    }

    #[test]
    fn other_statuses_keep_truncated_body() {
        let body = "x".repeat(500);
        let err = error_for_status(StatusCode::BAD_GATEWAY, &body, "m");
        match err {
            AiError::ApiError(msg) => {
                assert!(msg.starts_with("HTTP 502"));
                assert!(msg.len() < 300);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn in_band_rate_limits_are_recognized() {
        let groq = serde_json::json!({
            "message": "Rate limit reached for model",
            "type": "tokens",
            "code": "rate_limit_exceeded"
        });
        assert!(matches!(stream_error(&groq, "m"), AiError::RateLimited));

        let gemini = serde_json::json!({
            "code": 429,
            "message": "Resource has been exhausted (e.g. check quota).",
            "status": "RESOURCE_EXHAUSTED"
        });
        assert!(matches!(stream_error(&gemini, "m"), AiError::RateLimited));
    }

    #[test]
    fn other_in_band_errors_keep_message() {
        let err = stream_error(&serde_json::json!({"message": "upstream overloaded"}), "m");
        assert!(matches!(err, AiError::ApiError(ref m) if m == "upstream overloaded"));
        let err = stream_error(&serde_json::json!({}), "m");
        assert!(matches!(err, AiError::ApiError(ref m) if m == "stream reported an error"));
    }
}
