use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Context error: {0}")]
    ContextError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::ModelError(msg.into())
    }

    pub fn context(msg: impl Into<String>) -> Self {
        Self::ContextError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::StorageError(_))
    }

    pub fn is_model_error(&self) -> bool {
        matches!(self, Self::ModelError(_))
    }

    pub fn is_context_error(&self) -> bool {
        matches!(self, Self::ContextError(_))
    }
}
