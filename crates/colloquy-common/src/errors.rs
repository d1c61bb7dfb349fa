use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    /// No source produced an API key.
    #[error("{provider} API key not found. Set {checked} or add it to secrets.toml")]
    MissingCredential { provider: String, checked: String },

    /// A key was found but does not look like one for this provider.
    /// `seen` only ever holds the first few characters of the key.
    #[error(
        "invalid {provider} key format: the key starts with '{seen}...' but it should start with '{expected}'"
    )]
    InvalidCredential {
        provider: String,
        seen: String,
        expected: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ColloquyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("ai error: {0}")]
    Ai(String),

}
