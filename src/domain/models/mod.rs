mod chat_reply;
mod context_document;
mod prompt;
mod session;
mod turn;

pub use chat_reply::*;
pub use context_document::*;
pub use prompt::*;
pub use session::*;
pub use turn::*;
