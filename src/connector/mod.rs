//! # Connector Layer
//!
//! External integrations implementing application ports:
//! - History storage (Upstash Redis REST, in-memory)
//! - Context loading (CSV knowledge base)
//! - Model access (Gemini, offline mock)
//! - Front-ends (HTTP server, CLI controllers)

pub mod adapter;
pub mod api;

pub use adapter::*;
