mod chat_client;
mod context_source;
mod history_repository;

pub use chat_client::*;
pub use context_source::*;
pub use history_repository::*;
