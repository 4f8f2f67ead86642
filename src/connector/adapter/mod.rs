mod csv_context_loader;
mod gemini_client;
mod in_memory_history_repository;
mod mock_chat_client;
mod upstash_history_repository;

pub mod http;

pub use csv_context_loader::*;
pub use gemini_client::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
pub use in_memory_history_repository::*;
pub use mock_chat_client::*;
pub use upstash_history_repository::*;
