//! Error types for the bot test runner
//!
//! Only configuration and argument failures are fatal to a run. Service
//! failures are carried as [`ClientError`] and turned into a failed
//! sequence by the pipeline, never into an [`Error`].

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the test runner
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: &str, error: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            error: error.to_string(),
        }
    }
}

/// A failed call to the conversational service
#[derive(Error, Debug, Clone)]
#[error("postText call failed with {message}")]
pub struct ClientError {
    /// Human-readable description, including the service error code if any
    pub message: String,
    /// Request id reported by the service, when the call got that far
    pub request_id: Option<String>,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}
