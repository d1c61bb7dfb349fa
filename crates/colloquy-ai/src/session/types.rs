//! Turn lifecycle types and failure categories.

use colloquy_common::Notice;

use crate::AiError;

/// Assistant text committed when a turn fails before any reply text arrived.
pub const FALLBACK_REPLY: &str = "Sorry, I ran into a problem. Please try again.";

/// Misuse of the session API. Provider failures are never reported this way.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyInput,
    #[error("invalid voice configuration: {0}")]
    InvalidVoiceConfig(String),
}

/// Where the current (or last) turn is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingProvider,
    Streaming,
    Complete,
    Failed,
}

/// Progress report delivered while a streamed turn runs.
///
/// Order is always `AwaitingProvider`, zero or more `Streaming`, then
/// exactly one of `Complete` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnUpdate<'a> {
    AwaitingProvider,
    Streaming { delta: &'a str, partial: &'a str },
    Complete { reply: &'a str },
    Failed { category: &'a FailureCategory },
}

/// User-facing class of a provider failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCategory {
    Authentication,
    ModelNotFound { model: String },
    RateLimited { model: String },
    Transport { detail: String },
}

impl FailureCategory {
    pub fn from_error(err: &AiError, model: &str) -> Self {
        match err {
            AiError::Authentication(_) => Self::Authentication,
            AiError::ModelNotFound(m) => Self::ModelNotFound { model: m.clone() },
            AiError::RateLimited => Self::RateLimited {
                model: model.to_string(),
            },
            AiError::ApiError(_)
            | AiError::NetworkError(_)
            | AiError::ParseError(_)
            | AiError::Timeout => Self::Transport {
                detail: err.to_string(),
            },
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication => "Authentication error: the API key was rejected. \
                 Check your key for extra spaces or quotes."
                .to_string(),
            Self::ModelNotFound { model } => {
                format!("Model '{model}' was not found. Pick a different model.")
            }
            Self::RateLimited { model } => {
                format!("Rate limit exceeded for '{model}'. Try switching to a different model.")
            }
            Self::Transport { detail } => format!("An error occurred: {detail}"),
        }
    }

    pub fn notice(&self) -> Notice {
        Notice::error(self.user_message())
    }
}

/// Result of one submitted turn. Either way, one assistant turn was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed {
        reply: String,
    },
    Failed {
        category: FailureCategory,
        /// Assistant text committed in place of a reply.
        committed: String,
    },
}

impl TurnOutcome {
    /// The assistant text that was appended to the transcript.
    pub fn committed_text(&self) -> &str {
        match self {
            Self::Completed { reply } => reply,
            Self::Failed { committed, .. } => committed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn failure(&self) -> Option<&FailureCategory> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { category, .. } => Some(category),
        }
    }
}
