//! Interactive application state: the session, the active provider and
//! the line-oriented loop that drives them.

mod commands;
mod core;
mod dispatch;
mod init;
mod render;
mod repl;

pub use self::core::{ColloquyApp, StartupOptions};
