use tracing::debug;

use crate::domain::{DomainError, Session, SessionId, SessionIdStyle};

/// Resolves the session a request belongs to, minting a new id when the
/// caller did not supply one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionResolver {
    style: SessionIdStyle,
}

impl SessionResolver {
    pub fn new(style: SessionIdStyle) -> Self {
        Self { style }
    }

    /// A blank id counts as absent. Sessions are not stored records, so a
    /// supplied id is resumed without touching the history store.
    pub fn get_or_create(&self, requested: Option<&str>) -> Result<Session, DomainError> {
        match requested.map(str::trim).filter(|id| !id.is_empty()) {
            Some(raw) => Ok(Session::resumed(SessionId::parse(raw)?)),
            None => {
                let id = SessionId::generate(self.style);
                debug!("Created session {} ({})", id, self.style.as_str());
                Ok(Session::new(id))
            }
        }
    }
}
