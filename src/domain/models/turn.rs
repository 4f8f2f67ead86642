use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Number of entries a session log retains before the oldest are discarded.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Role implied by an untagged entry's position in the log.
    pub fn from_position(index: usize) -> Self {
        if index % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a session's history.
///
/// Stored as a role-tagged JSON object. Logs written before role tags existed
/// hold plain strings; [`Turn::decode`] labels those by position parity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Serialized form written to the history store.
    pub fn encode(&self) -> Result<String, DomainError> {
        serde_json::to_string(self)
            .map_err(|e| DomainError::internal(format!("Failed to encode turn: {}", e)))
    }

    /// Reads a stored entry found at `index` in its session log.
    pub fn decode(raw: &str, index: usize) -> Self {
        if raw.trim_start().starts_with('{') {
            if let Ok(turn) = serde_json::from_str::<Turn>(raw) {
                return turn;
            }
        }

        Self::new(Role::from_position(index), raw)
    }

    pub fn decode_all<S: AsRef<str>>(entries: &[S]) -> Vec<Turn> {
        entries
            .iter()
            .enumerate()
            .map(|(i, raw)| Self::decode(raw.as_ref(), i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_turn_keeps_its_role_at_any_position() {
        let raw = Turn::assistant("Hello, I'm Sophia").encode().unwrap();

        assert_eq!(raw, r#"{"role":"assistant","content":"Hello, I'm Sophia"}"#);
        assert_eq!(Turn::decode(&raw, 0), Turn::assistant("Hello, I'm Sophia"));
    }

    #[test]
    fn untagged_entries_fall_back_to_position_parity() {
        let turns = Turn::decode_all(&["a", "b", "c", "d"]);
        let roles: Vec<Role> = turns.iter().map(|t| t.role()).collect();

        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(turns[2].content(), "c");
    }

    #[test]
    fn json_that_is_not_a_turn_is_plain_text() {
        let raw = r#"{"order": 1234, "status": "late"}"#;
        let turn = Turn::decode(raw, 1);

        assert_eq!(turn.role(), Role::Assistant);
        assert_eq!(turn.content(), raw);
    }
}
