use std::fmt;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::DomainError;

/// Prefix of the store key holding a session's turn log.
pub const SESSION_KEY_PREFIX: &str = "chat:";

/// Upper bound on the length of a caller-supplied session id.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// How fresh session ids are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionIdStyle {
    #[default]
    Uuid,
    /// `YYYYMMDD-SSSSS`: local date plus zero-padded seconds since midnight.
    /// Two sessions started within the same second share an id.
    Timestamp,
}

impl SessionIdStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionIdStyle::Uuid => "uuid",
            SessionIdStyle::Timestamp => "timestamp",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "uuid" | "random" => SessionIdStyle::Uuid,
            "timestamp" | "time" => SessionIdStyle::Timestamp,
            unknown => {
                warn!(
                    "Unknown session id style '{}', defaulting to uuid",
                    unknown
                );
                SessionIdStyle::Uuid
            }
        }
    }
}

/// Opaque token identifying a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Validates a caller-supplied id.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let id = raw.trim();

        if id.is_empty() {
            return Err(DomainError::invalid_input("session id is empty"));
        }

        if id.chars().count() > MAX_SESSION_ID_LEN {
            return Err(DomainError::invalid_input(format!(
                "session id exceeds {} characters",
                MAX_SESSION_ID_LEN
            )));
        }

        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DomainError::invalid_input(
                "session id must not contain whitespace or control characters",
            ));
        }

        Ok(Self(id.to_string()))
    }

    pub fn generate(style: SessionIdStyle) -> Self {
        match style {
            SessionIdStyle::Uuid => Self(Uuid::new_v4().to_string()),
            SessionIdStyle::Timestamp => Self::timestamped(Local::now().naive_local()),
        }
    }

    pub fn timestamped(at: NaiveDateTime) -> Self {
        let date = at.format("%Y%m%d");
        let seconds = at.num_seconds_from_midnight();
        Self(format!("{}-{:05}", date, seconds))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of this session's turn log in the history store.
    pub fn storage_key(&self) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle returned by `get_or_create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    created: bool,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self { id, created: true }
    }

    pub fn resumed(id: SessionId) -> Self {
        Self { id, created: false }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// True when the id was generated for this request rather than supplied.
    pub fn is_new(&self) -> bool {
        self.created
    }

    pub fn into_id(self) -> SessionId {
        self.id
    }
}
