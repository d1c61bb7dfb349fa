use std::path::PathBuf;

use clap::Parser;
use colloquy_ai::{PersonaKind, ProviderKind};

/// Colloquy: a terminal chat client for hosted language models.
#[derive(Parser, Debug)]
#[command(name = "colloquy", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// tracing directive such as `colloquy_ai=debug`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Completion provider (groq or gemini).
    #[arg(long)]
    pub provider: Option<ProviderKind>,

    /// Model identifier override.
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key; takes precedence over config, environment and secrets.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Starting persona (ingres or general).
    #[arg(short, long)]
    pub persona: Option<PersonaKind>,

    /// Wait for complete replies instead of streaming them.
    #[arg(long)]
    pub no_stream: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
