//! Console reporting of sequence outcomes

use colored::Colorize;
use serde::Serialize;

use crate::lex::{BotResponse, PostTextRequest};

/// Details of the interaction that failed a sequence
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    pub message: String,
    pub request_id: Option<String>,
    /// Utterance of the failing interaction
    pub utterance: Option<String>,
    pub params: Option<PostTextRequest>,
    /// Raw service response; absent when the call itself failed
    pub response: Option<BotResponse>,
}

impl FailureRecord {
    /// A failure not tied to any particular request
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            request_id: None,
            utterance: None,
            params: None,
            response: None,
        }
    }
}

/// Final state of one sequence
#[derive(Debug, Clone)]
pub enum SequenceOutcome {
    Passed { name: String },
    Failed { name: String, failure: Box<FailureRecord> },
}

impl SequenceOutcome {
    pub fn name(&self) -> &str {
        match self {
            SequenceOutcome::Passed { name } | SequenceOutcome::Failed { name, .. } => name,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, SequenceOutcome::Passed { .. })
    }

    pub fn failure(&self) -> Option<&FailureRecord> {
        match self {
            SequenceOutcome::Passed { .. } => None,
            SequenceOutcome::Failed { failure, .. } => Some(failure),
        }
    }
}

/// Outcomes of a whole run, in declaration order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<SequenceOutcome>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Sink for run progress and sequence outcomes
pub trait Reporter: Send + Sync {
    /// A sequence was admitted and is about to send its first utterance
    fn sequence_started(&self, index: usize, total: usize, sequence: &str);

    fn report_success(&self, sequence: &str, detail: &str);

    fn report_failure(&self, sequence: &str, failure: &FailureRecord);
}

/// Prints outcomes to stdout (passes) and stderr (failures)
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn sequence_started(&self, index: usize, total: usize, sequence: &str) {
        println!(
            "{} Test sequence {} / {} - {}",
            "I".cyan(),
            index + 1,
            total,
            sequence.white().bold()
        );
    }

    fn report_success(&self, sequence: &str, detail: &str) {
        let blob = serde_json::json!({ "message": detail, "sequence": sequence });
        println!(
            "{}  Sequence [{}] {} ~ {}",
            "+".green(),
            sequence,
            "PASSED!".green().bold(),
            blob
        );
    }

    fn report_failure(&self, sequence: &str, failure: &FailureRecord) {
        let blob = serde_json::to_string(failure)
            .unwrap_or_else(|_| format!("{{\"message\":{:?}}}", failure.message));
        eprintln!(
            "{}  Sequence [{}] {} ~ {}",
            "-".red(),
            sequence,
            "FAILED!".red().bold(),
            blob
        );
    }
}

/// Print the end-of-run totals
pub fn print_summary(summary: &RunSummary) {
    let passed = format!("{} passed", summary.passed());
    let failed = format!("{} failed", summary.failed());

    if summary.all_passed() {
        println!("\n{} {}, {}\n", "✓".green().bold(), passed.green(), failed);
    } else {
        println!("\n{} {}, {}\n", "✗".red().bold(), passed, failed.red());
        for outcome in summary.outcomes.iter().filter(|o| !o.passed()) {
            if let Some(failure) = outcome.failure() {
                println!("  {} {}: {}", "✗".red(), outcome.name(), failure.message);
            }
        }
    }
}
