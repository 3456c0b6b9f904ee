//! Bounded-concurrency sequence scheduler
//!
//! Sequences are admitted in declaration order, each holding one permit of
//! a fair semaphore for as long as its pipeline runs. Completion order is
//! unconstrained.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tracing::error;

use crate::common::{Error, Result};

use super::config::Sequence;
use super::reporter::{FailureRecord, RunSummary, SequenceOutcome};
use super::runner::{run_sequence, RunContext};

/// Runs sequences with at most `max_concurrent` in flight
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    max_concurrent: usize,
}

impl Scheduler {
    /// A limit of zero is raised to one
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Run all sequences and wait for the last one to report
    pub async fn run(&self, ctx: Arc<RunContext>, sequences: Vec<Sequence>) -> Result<RunSummary> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let total = sequences.len();
        let mut names = Vec::with_capacity(total);
        let mut handles = Vec::with_capacity(total);

        for (index, sequence) in sequences.into_iter().enumerate() {
            // tokio's semaphore is FIFO, so admission follows declaration order
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| Error::Internal(format!("Sequence semaphore closed: {}", e)))?;

            ctx.reporter
                .sequence_started(index, total, sequence.display_name());
            names.push(sequence.display_name().to_string());

            let ctx = Arc::clone(&ctx);
            handles.push(tokio::spawn(async move {
                let outcome = run_sequence(&ctx, index, &sequence).await;
                drop(permit);
                outcome
            }));
        }

        let outcomes = join_all(handles)
            .await
            .into_iter()
            .zip(names)
            .map(|(joined, name)| match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(sequence = %name, "Sequence task aborted: {}", e);
                    let failure = FailureRecord::internal(format!("Sequence task aborted: {}", e));
                    ctx.reporter.report_failure(&name, &failure);
                    SequenceOutcome::Failed {
                        name,
                        failure: Box::new(failure),
                    }
                }
            })
            .collect();

        Ok(RunSummary { outcomes })
    }
}
