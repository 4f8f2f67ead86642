use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::HistoryRepository;
use crate::domain::{DomainError, SessionId, Turn, DEFAULT_HISTORY_LIMIT};

/// Process-local history store for development and tests.
///
/// Entries are kept in their encoded form so reads go through the same
/// decoding path as the remote store.
pub struct InMemoryHistoryRepository {
    logs: Arc<Mutex<HashMap<String, Vec<String>>>>,
    limit: usize,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            logs: Arc::new(Mutex::new(HashMap::new())),
            limit: limit.max(1),
        }
    }

    /// Pushes a raw entry without encoding, as an older writer would have.
    pub async fn push_raw(&self, session_id: &SessionId, entry: impl Into<String>) {
        let mut logs = self.logs.lock().await;
        let log = logs.entry(session_id.storage_key()).or_default();
        log.push(entry.into());
        trim_to_limit(log, self.limit);
    }

    pub async fn session_count(&self) -> usize {
        self.logs.lock().await.len()
    }
}

impl Default for InMemoryHistoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_to_limit(log: &mut Vec<String>, limit: usize) {
    if log.len() > limit {
        let excess = log.len() - limit;
        log.drain(..excess);
    }
}

impl InMemoryHistoryRepository {
    async fn push_and_trim(
        &self,
        session_id: &SessionId,
        turns: &[&Turn],
    ) -> Result<(), DomainError> {
        let entries = turns
            .iter()
            .map(|turn| turn.encode())
            .collect::<Result<Vec<_>, _>>()?;

        let mut logs = self.logs.lock().await;
        let log = logs.entry(session_id.storage_key()).or_default();
        log.extend(entries);
        trim_to_limit(log, self.limit);

        debug!(
            "Appended {} turns to {} ({} retained)",
            turns.len(),
            session_id,
            log.len()
        );
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, session_id: &SessionId, turn: &Turn) -> Result<(), DomainError> {
        self.push_and_trim(session_id, &[turn]).await
    }

    async fn append_exchange(
        &self,
        session_id: &SessionId,
        user: &Turn,
        assistant: &Turn,
    ) -> Result<(), DomainError> {
        self.push_and_trim(session_id, &[user, assistant]).await
    }

    async fn read_all(&self, session_id: &SessionId) -> Result<Vec<Turn>, DomainError> {
        let logs = self.logs.lock().await;
        Ok(logs
            .get(&session_id.storage_key())
            .map(|log| Turn::decode_all(log))
            .unwrap_or_default())
    }

    fn limit(&self) -> usize {
        self.limit
    }
}
