//! Groq chat-completion client.
//!
//! Implements `CompletionProvider` against the OpenAI-compatible
//! `/chat/completions` endpoint served by Groq.

mod api;
mod client;
mod config;


pub use client::GroqClient;
pub use config::{GroqConfig, GROQ_API_BASE};
