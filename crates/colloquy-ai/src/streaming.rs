//! Server-Sent Events (SSE) streaming parser.
//!
//! Both the Groq and Gemini APIs stream replies as SSE. Fragments are
//! delivered to the callback as soon as each event is complete; a stream
//! that drops mid-way returns an error after the events already seen.

use futures_util::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;

use crate::AiError;

/// Data payload that OpenAI-compatible APIs send as the final event.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, when the server names one.
    pub event: Option<String>,
    /// The event data (usually a JSON string).
    pub data: String,
}

impl SseEvent {
    pub fn is_done(&self) -> bool {
        self.data.trim() == DONE_SENTINEL
    }
}

/// Parse an SSE stream from a reqwest response, calling `on_event` for each event.
pub async fn parse_sse_stream(
    response: reqwest::Response,
    on_event: impl FnMut(SseEvent),
) -> Result<(), AiError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    parse_sse_lines(reader, on_event).await
}

/// Parse SSE events from any buffered async reader.
pub async fn parse_sse_lines<R>(reader: R, mut on_event: impl FnMut(SseEvent)) -> Result<(), AiError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    let mut current_event: Option<String> = None;
    let mut current_data = String::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| AiError::NetworkError(format!("stream interrupted: {e}")))?
    {
        let line = line.strip_suffix('\r').unwrap_or(&line);

        if line.is_empty() {
            // Empty line = end of event
            if !current_data.is_empty() {
                on_event(SseEvent {
                    event: current_event.take(),
                    data: std::mem::take(&mut current_data),
                });
            }
            current_event = None;
            continue;
        }

        if let Some(event_type) = field_value(line, "event") {
            current_event = Some(event_type.to_string());
        } else if let Some(data) = field_value(line, "data") {
            if !current_data.is_empty() {
                current_data.push('\n');
            }
            current_data.push_str(data);
        }
        // Ignore other fields (id:, retry:, comments)
    }

    // Flush any remaining event
    if !current_data.is_empty() {
        on_event(SseEvent {
            event: current_event,
            data: current_data,
        });
    }

    Ok(())
}

/// `field: value` with the single optional space after the colon removed.
fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(field)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}
