use crate::domain::{ContextDocument, MessageRole, Prompt, PromptMessage, Turn};

/// Placeholder in the system template that receives the context document.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a customer support agent called Sophia. \
You should maintain greetings. You must only answer the user questions based on this \
context: {context}.";

/// Builds the message sequence for a model call.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    system_template: String,
}

impl PromptAssembler {
    pub fn new(system_template: impl Into<String>) -> Self {
        Self {
            system_template: system_template.into(),
        }
    }

    pub fn render_system(&self, context: &ContextDocument) -> String {
        self.system_template
            .replace(CONTEXT_PLACEHOLDER, context.text())
    }

    /// System message, then one message per history turn with its role, then
    /// `input` as the final user message.
    pub fn assemble(&self, context: &ContextDocument, history: &[Turn], input: &str) -> Prompt {
        let mut messages = Vec::with_capacity(history.len() + 2);

        messages.push(PromptMessage::new(
            MessageRole::System,
            self.render_system(context),
        ));
        messages.extend(history.iter().map(PromptMessage::from));
        messages.push(PromptMessage::new(MessageRole::User, input));

        Prompt::new(messages)
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(prompt: &Prompt) -> Vec<MessageRole> {
        prompt.messages().iter().map(|m| m.role()).collect()
    }

    #[test]
    fn context_is_interpolated_into_every_placeholder() {
        let assembler = PromptAssembler::new("Use {context}. Again: {context}");
        let context = ContextDocument::new("refunds take 5 days", 1);

        assert_eq!(
            assembler.render_system(&context),
            "Use refunds take 5 days. Again: refunds take 5 days"
        );
    }

    #[test]
    fn empty_history_yields_system_and_input_only() {
        let prompt = PromptAssembler::default().assemble(&ContextDocument::default(), &[], "Hi");

        assert_eq!(roles(&prompt), vec![MessageRole::System, MessageRole::User]);
        assert_eq!(prompt.latest_user_input(), Some("Hi"));
    }

    #[test]
    fn legacy_entries_alternate_user_and_assistant() {
        let history = Turn::decode_all(&["a", "b", "c", "d"]);
        let prompt = PromptAssembler::default().assemble(&ContextDocument::default(), &history, "e");

        assert_eq!(
            roles(&prompt),
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
            ]
        );
        let contents: Vec<&str> = prompt.conversation().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn tagged_history_keeps_stored_roles_after_odd_truncation() {
        // Log whose oldest user turn was trimmed away.
        let history = vec![Turn::assistant("b"), Turn::user("c"), Turn::assistant("d")];
        let prompt = PromptAssembler::default().assemble(&ContextDocument::default(), &history, "e");

        assert_eq!(
            roles(&prompt)[1..],
            [
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
            ]
        );
    }
}
