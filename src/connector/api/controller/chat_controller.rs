use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::error;

use super::super::Container;
use super::ASSISTANT_NAME;

/// Input that ends the interactive loop, compared case-insensitively.
pub const EXIT_COMMAND: &str = "exit";

/// Interactive read-eval loop over a line reader and a writer.
pub struct ChatController<'a> {
    container: &'a Container,
    show_spinner: bool,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            container,
            show_spinner: true,
        }
    }

    pub fn with_spinner(mut self, show: bool) -> Self {
        self.show_spinner = show;
        self
    }

    pub async fn chat(&self, session: Option<String>) -> Result<String> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run(stdin, tokio::io::stdout(), session).await?;
        Ok(String::new())
    }

    /// Runs until `exit` or end of input and returns the last session id.
    /// Failed exchanges are reported and the loop continues on the same session.
    pub async fn run<R, W>(
        &self,
        reader: R,
        mut writer: W,
        mut session: Option<String>,
    ) -> Result<Option<String>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let use_case = self.container.chatbot_use_case();
        let mut lines = reader.lines();

        writer
            .write_all(b"Welcome to the interactive chatbot!\nType 'exit' to end the conversation.\n")
            .await?;

        loop {
            writer.write_all(b"\nYou: ").await?;
            writer.flush().await?;

            let Some(line) = lines.next_line().await? else {
                writer.write_all(b"\n").await?;
                break;
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if input.eq_ignore_ascii_case(EXIT_COMMAND) {
                writer
                    .write_all(b"Thank you for using the chatbot. Goodbye!\n")
                    .await?;
                break;
            }

            let spinner = self.spinner();
            let result = use_case.execute(input, session.as_deref()).await;
            spinner.finish_and_clear();

            match result {
                Ok(reply) => {
                    let (response, session_id) = reply.into_parts();
                    writer
                        .write_all(format!("\n{}: {}\n", ASSISTANT_NAME, response).as_bytes())
                        .await?;
                    session = Some(session_id.into_string());
                }
                Err(e) => {
                    error!("An error occurred: {}", e);
                    if e.is_invalid_input() {
                        writer.write_all(format!("{}\n", e).as_bytes()).await?;
                    }
                    writer.write_all(b"Please try again.\n").await?;
                }
            }
        }

        writer.flush().await?;
        Ok(session)
    }

    fn spinner(&self) -> ProgressBar {
        if !self.show_spinner {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("{} is thinking...", ASSISTANT_NAME));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
