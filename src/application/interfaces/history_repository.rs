use async_trait::async_trait;

use crate::domain::{DomainError, SessionId, Turn};

/// Per-session turn log on a list-valued store.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Appends one turn, then trims the log to its most recent [`Self::limit`]
    /// entries.
    async fn append(&self, session_id: &SessionId, turn: &Turn) -> Result<(), DomainError>;

    /// Appends a user turn and its reply as one write, then trims. Either both
    /// turns are stored or neither is.
    async fn append_exchange(
        &self,
        session_id: &SessionId,
        user: &Turn,
        assistant: &Turn,
    ) -> Result<(), DomainError>;

    /// Full retained log in insertion order. Unknown sessions yield an empty log.
    async fn read_all(&self, session_id: &SessionId) -> Result<Vec<Turn>, DomainError>;

    fn limit(&self) -> usize;
}
