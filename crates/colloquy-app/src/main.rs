mod app_state;
mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colloquy_config::schema::LOG_LEVELS;
use colloquy_config::SecretsStore;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use app_state::{ColloquyApp, StartupOptions};

const DEFAULT_LOG_DIRECTIVE: &str = "colloquy=info";

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped, an
/// optional `export ` prefix is dropped and surrounding quotes are removed.
fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Load the first `.env` found (working directory, then config directory)
/// into the process environment. Variables already set are left alone.
fn load_dotenv() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Ok(dir) = colloquy_config::toml_loader::config_dir() {
        candidates.push(dir.join(".env"));
    }

    for path in candidates {
        if apply_dotenv(&path) {
            return Some(path);
        }
    }
    None
}

fn apply_dotenv(path: &Path) -> bool {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return false;
    };
    for (key, value) in parse_dotenv(&contents) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(key, value);
        }
    }
    true
}

/// A bare level applies to every colloquy crate; anything else is passed
/// through as a tracing directive.
fn log_directive(level: Option<&str>) -> String {
    match level.map(str::trim) {
        None | Some("") => DEFAULT_LOG_DIRECTIVE.to_string(),
        Some(l) if LOG_LEVELS.contains(&l.to_ascii_lowercase().as_str()) => {
            format!("colloquy={}", l.to_ascii_lowercase())
        }
        Some(other) => other.to_string(),
    }
}

fn init_logging(level: Option<&str>) {
    let directive = log_directive(level);
    let filter = EnvFilter::from_default_env();
    let filter = match directive.parse::<Directive>() {
        Ok(d) => filter.add_directive(d),
        Err(_) => filter.add_directive(LevelFilter::INFO.into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Before anything reads the environment (and before the runtime spawns threads).
    let dotenv = load_dotenv();

    let config = colloquy_config::load_config(args.config.as_deref());
    let level = args.log_level.clone().or_else(|| {
        config
            .as_ref()
            .ok()
            .map(|c| c.logging.level.clone())
    });
    init_logging(level.as_deref());

    tracing::info!("Colloquy v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Config load failed: {e}");
            eprintln!("colloquy: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(kind) = args.provider {
        config.provider.kind = kind;
    }

    let secrets = match SecretsStore::load_default() {
        Ok(secrets) => secrets,
        Err(e) => {
            tracing::error!("Secrets load failed: {e}");
            eprintln!("colloquy: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = StartupOptions {
        api_key: args.api_key,
        model: args.model,
        persona: args.persona,
        no_stream: args.no_stream,
    };
    let (mut app, notices) = match ColloquyApp::new(config, secrets, options) {
        Ok(started) => started,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            eprintln!("colloquy: {e}");
            return ExitCode::FAILURE;
        }
    };
    for notice in &notices {
        println!("{notice}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("colloquy: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(app.run()) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Session error: {e}");
            eprintln!("colloquy: {e}");
            ExitCode::FAILURE
        }
    }
}
