use async_trait::async_trait;
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{DomainError, Prompt};

const MOCK_MODEL_NAME: &str = "mock-chat";

/// Offline [`ChatClient`] that answers deterministically from the prompt.
pub struct MockChatClient {
    model: String,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            model: MOCK_MODEL_NAME.to_string(),
        }
    }

    fn generate_reply(prompt: &Prompt) -> String {
        let input = prompt.latest_user_input().unwrap_or_default();
        let prior_turns = prompt.conversation().count().saturating_sub(1);
        format!("You said: {} (prior turns: {})", input.trim(), prior_turns)
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, DomainError> {
        let reply = Self::generate_reply(prompt);
        debug!("Generated mock reply for a {}-message prompt", prompt.len());
        Ok(reply)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::PromptAssembler;
    use crate::domain::{ContextDocument, Turn};

    #[tokio::test]
    async fn test_mock_reply_is_deterministic() {
        let history = vec![Turn::user("hi"), Turn::assistant("hello")];
        let prompt =
            PromptAssembler::default().assemble(&ContextDocument::default(), &history, "bye");
        let client = MockChatClient::new();

        let first = client.complete(&prompt).await.unwrap();
        let second = client.complete(&prompt).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "You said: bye (prior turns: 2)");
    }
}
