//! # Domain Layer
//!
//! Core chatbot models: sessions, turns, prompts and the error type.
//! This layer is independent of external services and transports.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
