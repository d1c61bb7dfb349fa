//! Terminal output. The conversation goes to stdout; logs go to stderr.

use std::io::{self, Write};

use colloquy_ai::{HistoryConfig, Role, Turn, UsageTracker};
use colloquy_common::Notice;

use super::commands::HELP;

pub(super) const USER_LABEL: &str = "you";

pub(super) fn speaker(role: Role, assistant_label: &str) -> &str {
    match role {
        Role::User => USER_LABEL,
        Role::Assistant => assistant_label,
    }
}

pub(super) fn format_turn(turn: &Turn, assistant_label: &str) -> String {
    format!("{}> {}", speaker(turn.role, assistant_label), turn.content)
}

pub(super) fn format_usage(usage: &UsageTracker) -> String {
    if usage.call_count() == 0 {
        return "No requests yet.".to_string();
    }
    let mut out = String::new();
    for (model, u) in usage.models() {
        out.push_str(&format!(
            "  {model}: {} in / {} out\n",
            u.input_tokens, u.output_tokens
        ));
    }
    let total = usage.total();
    out.push_str(&format!(
        "  total: {} tokens over {} request(s)",
        total.total_tokens(),
        usage.call_count()
    ));
    out
}

/// Note shown under `/history` when requests carry only part of the transcript.
pub(super) fn format_history_policy(history: HistoryConfig) -> Option<String> {
    match history {
        HistoryConfig::Full => None,
        HistoryConfig::LastTurns(n) => Some(format!(
            "Only the greeting and the last {n} message(s) are sent to the model."
        )),
    }
}

pub(super) fn format_help() -> String {
    let width = HELP.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
    HELP.iter()
        .map(|(usage, what)| format!("  {usage:<width$}  {what}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn print_line(text: &str) {
    println!("{text}");
}

pub(super) fn print_notice(notice: &Notice) {
    println!("{notice}");
}

pub(super) fn print_turn(turn: &Turn, assistant_label: &str) {
    println!("{}", format_turn(turn, assistant_label));
}

pub(super) fn print_prompt() {
    print!("{USER_LABEL}> ");
    let _ = io::stdout().flush();
}

/// Start an assistant line whose text will arrive in pieces.
pub(super) fn begin_stream(assistant_label: &str) {
    print!("{assistant_label}> ");
    let _ = io::stdout().flush();
}

pub(super) fn print_delta(delta: &str) {
    print!("{delta}");
    let _ = io::stdout().flush();
}
