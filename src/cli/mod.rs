use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the chat API and the browser chat page
    Serve {
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,

        /// Directory holding index.html and its assets
        #[arg(long, default_value = "public")]
        static_dir: PathBuf,
    },

    /// Interactive chat in the terminal; type 'exit' to quit
    Chat {
        /// Resume an existing session instead of starting a new one
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Send a single message and print the reply
    Ask {
        message: String,

        #[arg(short, long)]
        session: Option<String>,
    },

    /// Print the retained turns of a session
    History {
        session_id: String,
    },
}
