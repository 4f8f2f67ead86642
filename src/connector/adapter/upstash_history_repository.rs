use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::HistoryRepository;
use crate::domain::{DomainError, SessionId, Turn};

const TRANSACTION_PATH: &str = "/multi-exec";

/// Reply to a single command: exactly one of `result` or `error` is set.
#[derive(Debug, Deserialize)]
struct CommandReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl CommandReply {
    fn into_result(self) -> Result<Value, DomainError> {
        match (self.error, self.result) {
            (Some(error), _) => Err(DomainError::storage(format!(
                "UpstashHistoryRepository: command failed: {error}"
            ))),
            (None, Some(value)) => Ok(value),
            (None, None) => Ok(Value::Null),
        }
    }
}

/// [`HistoryRepository`] over the Upstash Redis REST API.
///
/// Each session is a Redis list at `chat:<sessionId>`. Appends send
/// `RPUSH` + `LTRIM` as one `MULTI/EXEC` transaction, so a log never
/// exceeds its cap even when two requests for the same session interleave.
/// An exchange pushes both turns in the same `RPUSH`.
pub struct UpstashHistoryRepository {
    client: reqwest::Client,
    /// REST endpoint, without trailing slash.
    url: String,
    token: String,
    limit: usize,
}

impl UpstashHistoryRepository {
    pub fn new(url: impl Into<String>, token: impl Into<String>, limit: usize) -> Self {
        let url: String = url.into();
        Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            token: token.into(),
            limit: limit.max(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, DomainError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                DomainError::storage(format!("UpstashHistoryRepository: request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("UpstashHistoryRepository: store returned {status}: {body}");
            return Err(DomainError::storage(format!(
                "UpstashHistoryRepository: store returned {status}"
            )));
        }

        response.json().await.map_err(|e| {
            DomainError::storage(format!(
                "UpstashHistoryRepository: failed to parse response: {e}"
            ))
        })
    }

    async fn command(&self, args: Vec<String>) -> Result<Value, DomainError> {
        let body = self.post(&self.url, &Value::from(args)).await?;
        let reply: CommandReply = serde_json::from_value(body).map_err(|e| {
            DomainError::storage(format!("UpstashHistoryRepository: unexpected reply: {e}"))
        })?;
        reply.into_result()
    }

    async fn transaction(&self, commands: Vec<Vec<String>>) -> Result<Vec<Value>, DomainError> {
        let url = format!("{}{}", self.url, TRANSACTION_PATH);
        let body = Value::from(commands.into_iter().map(Value::from).collect::<Vec<_>>());
        let replies: Vec<CommandReply> = serde_json::from_value(self.post(&url, &body).await?)
            .map_err(|e| {
                DomainError::storage(format!(
                    "UpstashHistoryRepository: unexpected transaction reply: {e}"
                ))
            })?;

        replies
            .into_iter()
            .map(CommandReply::into_result)
            .collect()
    }

    async fn push_and_trim(
        &self,
        session_id: &SessionId,
        turns: &[&Turn],
    ) -> Result<(), DomainError> {
        let key = session_id.storage_key();

        let mut push = vec!["RPUSH".to_string(), key.clone()];
        for turn in turns {
            push.push(turn.encode()?);
        }
        let trim = vec![
            "LTRIM".to_string(),
            key.clone(),
            format!("-{}", self.limit),
            "-1".to_string(),
        ];

        let replies = self.transaction(vec![push, trim]).await?;
        let length = replies
            .first()
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_default();

        debug!(
            "Appended {} turns to {} (list length before trim: {})",
            turns.len(),
            key,
            length
        );
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for UpstashHistoryRepository {
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
        let key = session_id.storage_key();
        let value = self
            .command(vec![
                "LRANGE".to_string(),
                key.clone(),
                "0".to_string(),
                "-1".to_string(),
            ])
            .await?;

        let entries: Vec<String> = match value {
            Value::Null => Vec::new(),
            other => serde_json::from_value(other).map_err(|e| {
                DomainError::storage(format!(
                    "UpstashHistoryRepository: LRANGE {key} returned non-string entries: {e}"
                ))
            })?,
        };

        Ok(Turn::decode_all(&entries))
    }

    fn limit(&self) -> usize {
        self.limit
    }
}
