//! # Application Layer
//!
//! Ports implemented by the connector layer, and the use cases that sequence
//! them into a chatbot exchange.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
