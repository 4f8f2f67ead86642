pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatClient, ChatbotConfig, ContextSource, HistoryRepository, PromptAssembler,
    RunChatbotUseCase, SessionHistoryUseCase, SessionResolver,
};

pub use cli::Commands;

pub use connector::{
    CsvContextLoader, GeminiClient, InMemoryHistoryRepository, MockChatClient,
    UpstashHistoryRepository, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT,
};

pub use domain::{
    ChatReply, ContextDocument, DomainError, MessageRole, Prompt, PromptMessage, Role, Session,
    SessionId, SessionIdStyle, Turn, DEFAULT_HISTORY_LIMIT,
};
