//! Test configuration types
//!
//! Defines the data structures for deserializing bot test documents, in
//! either JSON or YAML.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::common::{Error, Result};

/// A complete test document for one bot
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    /// Optional description shown in the startup banner
    pub name: Option<String>,
    /// Name of the bot under test
    pub bot_name: String,
    /// Alias (published version) of the bot under test
    pub bot_alias: String,
    /// Pause between consecutive requests of a sequence; null or non-positive means none
    #[serde(default)]
    pub wait_between_requests_millis: Option<f64>,
    /// Session attributes sent with the first utterance of every sequence
    #[serde(default)]
    pub session_attributes: HashMap<String, String>,
    /// Overrides the runner's concurrency limit for this document
    pub max_concurrent_sequences: Option<usize>,
    /// The test sequences, in launch order
    pub sequences: Vec<Sequence>,
}

/// An ordered scenario run against a single bot session
#[derive(Deserialize, Debug, Clone)]
pub struct Sequence {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "sequence")]
    pub interactions: Vec<Interaction>,
}

impl Sequence {
    /// Name used in logs and session ids; `_` when none was given
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "_"
        } else {
            &self.name
        }
    }
}

/// One utterance and what the bot must answer
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub utterance: String,
    #[serde(default)]
    pub post_conditions: PostCondition,
}

/// Expectation checked against the bot's response
///
/// Only one kind is evaluated: message patterns first, then dialog state,
/// then slot values.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PostCondition {
    /// Acceptable response messages, tried in order
    pub message: Option<Vec<Pattern>>,
    pub dialog_state: Option<String>,
    pub intent_name: Option<String>,
    pub slots: Option<Vec<SlotExpectation>>,
}

impl PostCondition {
    pub fn message_patterns(&self) -> &[Pattern] {
        self.message.as_deref().unwrap_or_default()
    }

    pub fn slot_expectations(&self) -> &[SlotExpectation] {
        self.slots.as_deref().unwrap_or_default()
    }

    pub fn expected_dialog_state(&self) -> Option<&str> {
        self.dialog_state.as_deref().filter(|s| !s.is_empty())
    }

    pub fn expected_intent(&self) -> Option<&str> {
        self.intent_name.as_deref().filter(|s| !s.is_empty())
    }
}

/// Expected value for one slot
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SlotExpectation {
    pub slot_name: String,
    /// `None` (null or omitted) means the slot must be unfilled
    #[serde(default)]
    pub slot_value: Option<Pattern>,
}

/// A regular expression matched anywhere in the actual text
#[derive(Deserialize, Clone)]
#[serde(try_from = "String")]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Pattern)
            .map_err(|e| Error::invalid_pattern(pattern, e))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Pattern {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Pattern::new(&value)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.as_str())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TestConfig {
    /// Load a test document, choosing YAML or JSON by file extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: TestConfig = serde_json::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse test config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: TestConfig = serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse test config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks; post-condition content is judged at run time
    fn validate(&self) -> Result<()> {
        if self.bot_name.trim().is_empty() {
            return Err(Error::Config("'botName' must not be empty".to_string()));
        }
        if self.bot_alias.trim().is_empty() {
            return Err(Error::Config("'botAlias' must not be empty".to_string()));
        }
        if self.sequences.is_empty() {
            return Err(Error::Config("'sequences' must not be empty".to_string()));
        }
        if self.max_concurrent_sequences == Some(0) {
            return Err(Error::Config(
                "'maxConcurrentSequences' must be at least 1".to_string(),
            ));
        }
        for (i, sequence) in self.sequences.iter().enumerate() {
            if sequence.interactions.is_empty() {
                return Err(Error::Config(format!(
                    "Sequence {} ('{}') has no interactions",
                    i + 1,
                    sequence.display_name()
                )));
            }
        }
        Ok(())
    }

    /// Delay to insert between consecutive requests, if any
    pub fn pacing(&self) -> Option<Duration> {
        self.wait_between_requests_millis
            .filter(|ms| *ms > 0.0)
            .and_then(|ms| Duration::try_from_secs_f64(ms / 1000.0).ok())
    }

    /// Text for the startup banner, e.g. `CoffeeBot:prod - smoke tests`
    pub fn banner(&self) -> String {
        format!(
            "{}:{} - {}",
            self.bot_name,
            self.bot_alias,
            self.name.as_deref().unwrap_or("")
        )
    }
}
