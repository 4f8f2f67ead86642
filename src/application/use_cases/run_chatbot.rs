use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::{ChatClient, ContextSource, HistoryRepository};
use crate::domain::{ChatReply, DomainError, SessionIdStyle, Turn};

use super::{PromptAssembler, SessionResolver, DEFAULT_SYSTEM_PROMPT};

/// Settings the orchestrator is constructed with.
#[derive(Debug, Clone)]
pub struct ChatbotConfig {
    /// System instruction; `{context}` receives the context document.
    pub system_prompt: String,
    pub session_id_style: SessionIdStyle,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            session_id_style: SessionIdStyle::default(),
        }
    }
}

/// Runs one chatbot exchange: resolve the session, load context and history,
/// call the model, then persist the user and assistant turns.
///
/// Any failure aborts the exchange. Both turns are written in one append after
/// the model has answered, so a failed call leaves the stored history untouched.
pub struct RunChatbotUseCase {
    history_repo: Arc<dyn HistoryRepository>,
    context_source: Arc<dyn ContextSource>,
    chat_client: Arc<dyn ChatClient>,
    sessions: SessionResolver,
    assembler: PromptAssembler,
}

impl RunChatbotUseCase {
    pub fn new(
        config: ChatbotConfig,
        history_repo: Arc<dyn HistoryRepository>,
        context_source: Arc<dyn ContextSource>,
        chat_client: Arc<dyn ChatClient>,
    ) -> Self {
        Self {
            history_repo,
            context_source,
            chat_client,
            sessions: SessionResolver::new(config.session_id_style),
            assembler: PromptAssembler::new(config.system_prompt),
        }
    }

    pub async fn execute(
        &self,
        input: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, DomainError> {
        if input.trim().is_empty() {
            return Err(DomainError::invalid_input("message is empty"));
        }

        let session = self.sessions.get_or_create(session_id)?;
        let start_time = Instant::now();

        let context = self.context_source.load().await?;
        let history = self.history_repo.read_all(session.id()).await?;

        debug!(
            "Session {} (new={}): {} context units, {} prior turns",
            session.id(),
            session.is_new(),
            context.unit_count(),
            history.len()
        );

        let prompt = self.assembler.assemble(&context, &history, input);
        let response = self.chat_client.complete(&prompt).await?;

        self.history_repo
            .append_exchange(
                session.id(),
                &Turn::user(input),
                &Turn::assistant(response.as_str()),
            )
            .await?;

        info!(
            "Answered session {} with {} in {:.2}s",
            session.id(),
            self.chat_client.model_name(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(ChatReply::new(response, session.into_id()))
    }
}
