//! Conversational service boundary
//!
//! The runner only needs one operation from the bot service: send a line of
//! text within a session and get the turn result back. [`ConversationClient`]
//! is that seam; [`LexClient`] is the Amazon Lex implementation.

mod client;

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

use crate::common::ClientError;

pub use client::LexClient;

/// Parameters for a single text turn
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostTextRequest {
    pub bot_name: String,
    pub bot_alias: String,
    pub user_id: String,
    pub session_attributes: HashMap<String, String>,
    pub input_text: String,
}

/// Result of a single text turn
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BotResponse {
    pub message: Option<String>,
    pub dialog_state: Option<String>,
    pub intent_name: Option<String>,
    /// Slot values; `None` means the slot is known but unfilled
    pub slots: HashMap<String, Option<String>>,
    pub session_attributes: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl BotResponse {
    /// Resolved value of a slot, treating unknown and unfilled slots alike
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).and_then(|v| v.as_deref())
    }
}

/// Client for a conversational bot service
#[async_trait]
pub trait ConversationClient: Send + Sync {
    /// Send the request's input text and return the bot's turn result
    async fn post_text(&self, request: &PostTextRequest) -> Result<BotResponse, ClientError>;
}
