use async_trait::async_trait;

use crate::domain::{DomainError, Prompt};

/// Sends an assembled prompt to a text-generation model.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Returns the completion text for `prompt`. One request, no retries.
    async fn complete(&self, prompt: &Prompt) -> Result<String, DomainError>;

    fn model_name(&self) -> &str;
}
