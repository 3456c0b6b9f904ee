//! Regression test runner for Amazon Lex bots
//!
//! Sends scripted utterances to a live bot, one session per test sequence,
//! and checks every reply against the expected message, dialog state or
//! slot values.

pub mod cli;
pub mod commands;
pub mod common;
pub mod lex;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{ClientError, Error, Result};
pub use lex::{BotResponse, ConversationClient, PostTextRequest};
