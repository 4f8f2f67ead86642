use serde::{Deserialize, Serialize};

use super::SessionId;

/// Result of one chatbot exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    response: String,
    session_id: SessionId,
}

impl ChatReply {
    pub fn new(response: impl Into<String>, session_id: SessionId) -> Self {
        Self {
            response: response.into(),
            session_id,
        }
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn into_parts(self) -> (String, SessionId) {
        (self.response, self.session_id)
    }
}
