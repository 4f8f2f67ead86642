use std::sync::Arc;

use crate::application::HistoryRepository;
use crate::domain::{DomainError, SessionId, Turn};

pub struct SessionHistoryUseCase {
    history_repo: Arc<dyn HistoryRepository>,
}

impl SessionHistoryUseCase {
    pub fn new(history_repo: Arc<dyn HistoryRepository>) -> Self {
        Self { history_repo }
    }

    pub async fn execute(&self, session_id: &str) -> Result<Vec<Turn>, DomainError> {
        let id = SessionId::parse(session_id)?;
        self.history_repo.read_all(&id).await
    }

    pub fn limit(&self) -> usize {
        self.history_repo.limit()
    }
}
