mod prompt_assembler;
mod run_chatbot;
mod session;
mod session_history;

pub use prompt_assembler::*;
pub use run_chatbot::*;
pub use session::*;
pub use session_history::*;
