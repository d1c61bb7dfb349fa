//! Slash commands typed at the prompt.

use std::path::PathBuf;

use colloquy_ai::PersonaKind;

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Command {
    /// Blank line.
    Empty,
    /// Plain text to send as a turn.
    Message(String),
    Help,
    Reset,
    Persona(PersonaKind),
    Model(String),
    Key(String),
    /// Record from the microphone, or transcribe a WAV file when given.
    Voice(Option<PathBuf>),
    History,
    Usage,
    /// Print the loaded configuration with keys redacted.
    Config,
    Quit,
}

pub(super) const HELP: &[(&str, &str)] = &[
    ("/help", "show this help"),
    ("/reset", "clear the conversation"),
    ("/persona <ingres|general>", "switch assistant persona"),
    ("/model <id>", "switch model"),
    ("/key <api-key>", "use a different API key"),
    ("/voice [file.wav]", "speak a question, or transcribe a WAV file"),
    ("/history", "print the conversation so far"),
    ("/usage", "show token usage"),
    ("/config", "show the loaded settings (keys hidden)"),
    ("/quit", "exit"),
];

impl Command {
    /// Short name for logs; never includes arguments (keys in particular).
    pub(super) fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Message(_) => "message",
            Self::Help => "help",
            Self::Reset => "reset",
            Self::Persona(_) => "persona",
            Self::Model(_) => "model",
            Self::Key(_) => "key",
            Self::Voice(_) => "voice",
            Self::History => "history",
            Self::Usage => "usage",
            Self::Config => "config",
            Self::Quit => "quit",
        }
    }

    /// Classify a line. Lines not starting with `/` are messages; `//`
    /// escapes a message that really starts with a slash.
    pub(super) fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }
        if let Some(rest) = line.strip_prefix("//") {
            return Ok(Self::Message(format!("/{rest}")));
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Self::Message(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "help" | "h" | "?" => Ok(Self::Help),
            "reset" | "clear" => Ok(Self::Reset),
            "persona" => {
                if arg.is_empty() {
                    return Err("usage: /persona <ingres|general>".into());
                }
                arg.parse().map(Self::Persona)
            }
            "model" => required(arg, "usage: /model <id>").map(Self::Model),
            "key" => required(arg, "usage: /key <api-key>").map(Self::Key),
            "voice" | "mic" => Ok(Self::Voice(
                (!arg.is_empty()).then(|| PathBuf::from(arg)),
            )),
            "history" => Ok(Self::History),
            "usage" => Ok(Self::Usage),
            "config" | "settings" => Ok(Self::Config),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command '/{other}'. Type /help for a list.")),
        }
    }
}

fn required(arg: &str, usage: &str) -> Result<String, String> {
    if arg.is_empty() {
        Err(usage.to_string())
    } else {
        Ok(arg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            Command::parse("  What is a B-tree index?  "),
            Ok(Command::Message("What is a B-tree index?".into()))
        );
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(Command::parse("   "), Ok(Command::Empty));
    }

    #[test]
    fn double_slash_escapes() {
        assert_eq!(
            Command::parse("//etc/passwd?"),
            Ok(Command::Message("/etc/passwd?".into()))
        );
    }

    #[test]
    fn simple_commands() {
        assert_eq!(Command::parse("/help"), Ok(Command::Help));
        assert_eq!(Command::parse("/RESET"), Ok(Command::Reset));
        assert_eq!(Command::parse("/history"), Ok(Command::History));
        assert_eq!(Command::parse("/usage"), Ok(Command::Usage));
        assert_eq!(Command::parse("/config"), Ok(Command::Config));
        assert_eq!(Command::parse("/exit"), Ok(Command::Quit));
    }

    #[test]
    fn persona_argument_is_parsed() {
        assert_eq!(
            Command::parse("/persona general"),
            Ok(Command::Persona(PersonaKind::General))
        );
        assert_eq!(
            Command::parse("/persona db"),
            Ok(Command::Persona(PersonaKind::Ingres))
        );
        assert!(Command::parse("/persona pirate").is_err());
        assert!(Command::parse("/persona").is_err());
    }

    #[test]
    fn model_and_key_need_an_argument() {
        assert_eq!(
            Command::parse("/model   llama-3.1-8b-instant "),
            Ok(Command::Model("llama-3.1-8b-instant".into()))
        );
        assert_eq!(
            Command::parse("/key gsk_abc"),
            Ok(Command::Key("gsk_abc".into()))
        );
        assert!(Command::parse("/model").is_err());
        assert!(Command::parse("/key   ").is_err());
    }

    #[test]
    fn voice_takes_optional_file() {
        assert_eq!(Command::parse("/voice"), Ok(Command::Voice(None)));
        assert_eq!(
            Command::parse("/voice question.wav"),
            Ok(Command::Voice(Some(PathBuf::from("question.wav"))))
        );
    }

    #[test]
    fn name_omits_arguments() {
        let command = Command::parse("/key gsk_secret").unwrap();
        assert_eq!(command.name(), "key");
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = Command::parse("/frobnicate").unwrap_err();
        assert!(err.contains("/frobnicate"));
    }

    #[test]
    fn help_lists_every_command() {
        for name in ["/help", "/reset", "/persona", "/model", "/key", "/voice", "/history", "/usage", "/config", "/quit"] {
            assert!(HELP.iter().any(|(usage, _)| usage.starts_with(name)), "{name}");
        }
    }
}
