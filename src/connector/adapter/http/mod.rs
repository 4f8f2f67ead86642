mod payloads;
mod server;

pub use payloads::*;
pub use server::*;
