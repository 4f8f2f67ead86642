use anyhow::Result;

use crate::ChatReply;

use super::super::Container;
use super::ASSISTANT_NAME;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, message: String, session: Option<String>) -> Result<String> {
        let use_case = self.container.chatbot_use_case();
        let reply = use_case.execute(&message, session.as_deref()).await?;
        Ok(self.format_reply(&reply))
    }

    fn format_reply(&self, reply: &ChatReply) -> String {
        format!(
            "{}: {}\n\nSession: {}",
            ASSISTANT_NAME,
            reply.response(),
            reply.session_id()
        )
    }
}
