//! Bot regression test runner
//!
//! Loads a test document, drives each sequence against the bot through a
//! [`ConversationClient`], and checks every response against the declared
//! post-conditions.

mod config;
mod evaluator;
mod reporter;
mod runner;
mod scheduler;

use std::sync::Arc;

use crate::common::Result;
use crate::lex::ConversationClient;

pub use config::*;
pub use evaluator::{evaluate, Verdict};
pub use reporter::{
    print_summary, ConsoleReporter, FailureRecord, Reporter, RunSummary, SequenceOutcome,
};
pub use runner::{run_interaction, run_sequence, session_user_id, RunContext, Session};
pub use scheduler::Scheduler;

/// Run every sequence of `config` with at most `max_concurrent` in flight
pub async fn run_test_config(
    config: &TestConfig,
    client: Arc<dyn ConversationClient>,
    reporter: Arc<dyn Reporter>,
    max_concurrent: usize,
) -> Result<RunSummary> {
    let ctx = Arc::new(RunContext::new(config, client, reporter));
    Scheduler::new(max_concurrent)
        .run(ctx, config.sequences.clone())
        .await
}
