//! Conversation session management.
//!
//! A `Session` owns the transcript for one conversation and drives one
//! turn at a time through a `CompletionProvider`. Every accepted user
//! turn is paired with exactly one assistant turn, even on failure.

mod chat;
mod manager;
mod types;


pub use manager::Session;
pub use types::{
    FailureCategory, SessionError, TurnOutcome, TurnState, TurnUpdate, FALLBACK_REPLY,
};
