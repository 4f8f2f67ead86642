use async_trait::async_trait;

use crate::domain::{ContextDocument, DomainError};

/// Supplies the static reference text included in every prompt.
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Rebuilds the document from its source. Implementations do not cache.
    async fn load(&self) -> Result<ContextDocument, DomainError>;
}
