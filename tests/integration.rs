//! End-to-end tests for the bot test runner
//!
//! Library tests drive a full test document through a scripted in-process
//! bot. Binary tests cover the argument and configuration failures that
//! stop a run before any request is sent.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lexbot_test::testing::{self, FailureRecord, Reporter, TestConfig};
use lexbot_test::{BotResponse, ClientError, ConversationClient, PostTextRequest};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A tiny scripted CoffeeBot
///
/// Ordering keeps slot state per user id, so interleaved sequences stay
/// independent.
#[derive(Default)]
struct CoffeeBot {
    sessions: Mutex<HashMap<String, HashMap<String, Option<String>>>>,
    log: Mutex<Vec<(String, String)>>,
}

impl CoffeeBot {
    fn sent_by(&self, user_prefix: &str) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(user, _)| user.starts_with(user_prefix))
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl ConversationClient for CoffeeBot {
    async fn post_text(&self, request: &PostTextRequest) -> Result<BotResponse, ClientError> {
        self.log
            .lock()
            .unwrap()
            .push((request.user_id.clone(), request.input_text.clone()));
        tokio::task::yield_now().await;

        let mut sessions = self.sessions.lock().unwrap();
        let slots = sessions.entry(request.user_id.clone()).or_default();
        let text = request.input_text.as_str();

        let response = if text.contains("latte") {
            slots.insert("Type".into(), Some("latte".into()));
            slots.insert("Size".into(), None);
            slots.insert("Milk".into(), None);
            BotResponse {
                message: Some("What size of latte?".into()),
                dialog_state: Some("ElicitSlot".into()),
                intent_name: Some("OrderCoffee".into()),
                slots: slots.clone(),
                ..Default::default()
            }
        } else if text == "large" {
            slots.insert("Size".into(), Some("large".into()));
            BotResponse {
                message: Some("Shall I place the order?".into()),
                dialog_state: Some("ConfirmIntent".into()),
                intent_name: Some("OrderCoffee".into()),
                slots: slots.clone(),
                ..Default::default()
            }
        } else if text == "yes please" {
            BotResponse {
                message: Some("Your latte is on its way".into()),
                dialog_state: Some("Fulfilled".into()),
                intent_name: Some("OrderCoffee".into()),
                slots: slots.clone(),
                ..Default::default()
            }
        } else if text.starts_with("cancel") {
            BotResponse {
                message: Some("Order cancelled".into()),
                dialog_state: Some("Fulfilled".into()),
                intent_name: Some("CancelOrder".into()),
                ..Default::default()
            }
        } else {
            BotResponse {
                message: Some("Sorry, can you repeat that?".into()),
                dialog_state: Some("ElicitIntent".into()),
                ..Default::default()
            }
        };

        Ok(BotResponse {
            request_id: Some(format!("req-{}", text.replace(' ', "-"))),
            ..response
        })
    }
}

/// Fails every call with a service error
struct DownBot;

#[async_trait]
impl ConversationClient for DownBot {
    async fn post_text(&self, _: &PostTextRequest) -> Result<BotResponse, ClientError> {
        Err(ClientError::new("NotFoundException: bot not found"))
    }
}

#[derive(Default)]
struct Recorder {
    passed: Mutex<Vec<String>>,
    failed: Mutex<Vec<(String, FailureRecord)>>,
}

impl Reporter for Recorder {
    fn sequence_started(&self, _: usize, _: usize, _: &str) {}

    fn report_success(&self, sequence: &str, _: &str) {
        self.passed.lock().unwrap().push(sequence.to_string());
    }

    fn report_failure(&self, sequence: &str, failure: &FailureRecord) {
        self.failed
            .lock()
            .unwrap()
            .push((sequence.to_string(), failure.clone()));
    }
}

#[tokio::test]
async fn test_coffee_bot_document() {
    let config = TestConfig::load(&fixture("CoffeeBot-main.json")).unwrap();
    let bot = Arc::new(CoffeeBot::default());
    let recorder = Arc::new(Recorder::default());

    let summary = testing::run_test_config(&config, bot.clone(), recorder.clone(), 2)
        .await
        .unwrap();

    assert_eq!(summary.passed(), 1);
    assert_eq!(summary.failed(), 2);
    assert!(summary.outcomes[0].passed());
    assert_eq!(*recorder.passed.lock().unwrap(), ["order latte"]);

    let cancel = summary.outcomes[1].failure().unwrap();
    assert!(cancel.message.starts_with("Intent name did not match"));
    assert_eq!(cancel.request_id.as_deref(), Some("req-cancel-my-order"));
    assert_eq!(bot.sent_by("CoffeeBot-cancel-"), ["cancel my order"]);

    let none = summary.outcomes[2].failure().unwrap();
    assert_eq!(none.message, "no acceptable post-condition declared");

    assert_eq!(
        bot.sent_by("CoffeeBot-order_latte-"),
        ["I would like a latte", "large", "yes please"]
    );
    assert_eq!(recorder.failed.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_client_errors_fail_each_sequence_once() {
    let config = TestConfig::load(&fixture("CoffeeBot-main.json")).unwrap();
    let recorder = Arc::new(Recorder::default());

    let summary = testing::run_test_config(&config, Arc::new(DownBot), recorder.clone(), 1)
        .await
        .unwrap();

    assert_eq!(summary.failed(), 3);
    let failed = recorder.failed.lock().unwrap();
    assert_eq!(failed.len(), 3);
    for (_, failure) in failed.iter() {
        assert!(failure.message.contains("NotFoundException"));
        assert!(failure.response.is_none());
        assert_eq!(failure.params.as_ref().unwrap().bot_name, "CoffeeBot");
    }
}

#[tokio::test]
async fn test_yaml_document_loads_by_extension() {
    let config = TestConfig::load(&fixture("CoffeeBot-smoke.yaml")).unwrap();
    assert_eq!(config.banner(), "CoffeeBot:test - CoffeeBot smoke");
    assert_eq!(config.pacing(), Some(std::time::Duration::from_millis(5)));
    assert_eq!(config.max_concurrent_sequences, Some(1));
    assert_eq!(config.session_attributes["locale"], "en_US");
    assert_eq!(config.sequences.len(), 2);
    assert_eq!(config.sequences[1].display_name(), "_");

    let bot = Arc::new(CoffeeBot::default());
    let recorder = Arc::new(Recorder::default());
    let summary = testing::run_test_config(&config, bot.clone(), recorder.clone(), 1)
        .await
        .unwrap();

    assert_eq!(summary.passed(), 2);
    assert_eq!(*recorder.passed.lock().unwrap(), ["order latte", "_"]);
    assert_eq!(bot.sent_by("CoffeeBot-_-"), ["hello"]);
}

fn testlexbot(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_testlexbot"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_without_arguments_prints_usage() {
    let home = tempfile::tempdir().unwrap();
    let output = testlexbot(home.path()).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn test_cli_with_extra_arguments_prints_usage() {
    let home = tempfile::tempdir().unwrap();
    let output = testlexbot(home.path())
        .args(["a.json", "b.json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_cli_malformed_config_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    let output = testlexbot(home.path())
        .arg(fixture("malformed.json"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration file"), "stderr: {stderr}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Test sequence"));
}

#[test]
fn test_cli_missing_config_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    let output = testlexbot(home.path())
        .arg(home.path().join("does-not-exist.json"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read file"));
}
