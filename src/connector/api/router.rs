use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, HistoryController, ServeController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    chat_controller: ChatController<'a>,
    history_controller: HistoryController<'a>,
    serve_controller: ServeController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            chat_controller: ChatController::new(container),
            history_controller: HistoryController::new(container),
            serve_controller: ServeController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Serve {
                port,
                public,
                static_dir,
            } => self.serve_controller.serve(port, public, static_dir).await,
            Commands::Chat { session } => self.chat_controller.chat(session).await,
            Commands::Ask { message, session } => self.ask_controller.ask(message, session).await,
            Commands::History { session_id } => self.history_controller.history(session_id).await,
        }
    }
}
