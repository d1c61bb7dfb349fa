//! The read-eval-print loop.

use std::ops::ControlFlow;

use colloquy_common::{ColloquyError, Notice};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use super::commands::Command;
use super::core::ColloquyApp;
use super::render;

impl ColloquyApp {
    /// Read lines from stdin until `/quit` or end of input.
    pub async fn run(&mut self) -> Result<(), ColloquyError> {
        render::print_notice(&Notice::info(format!(
            "{} on {} ({}). Type /help for commands.",
            self.persona.label,
            self.model(),
            self.provider.kind()
        )));
        self.print_transcript();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            render::print_prompt();
            let Some(line) = lines.next_line().await? else {
                render::print_line("");
                break;
            };

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    render::print_notice(&Notice::warning(message));
                    continue;
                }
            };
            if let ControlFlow::Break(()) = self.dispatch(command).await {
                break;
            }
        }

        info!(
            session = %self.session.id(),
            turns = self.session.transcript().len(),
            "session ended"
        );
        Ok(())
    }
}
