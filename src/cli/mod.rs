//! CLI command handling
//!
//! Wires the test document, runner settings and the Lex client together
//! and prints the run's progress.

use std::sync::Arc;

use colored::Colorize;

use crate::commands::Cli;
use crate::common::config::Settings;
use crate::common::Result;
use crate::lex::LexClient;
use crate::testing::{self, ConsoleReporter, RunSummary, TestConfig};

/// Run the test document named on the command line
pub async fn run(cli: Cli) -> Result<RunSummary> {
    let settings = Settings::load()?;
    let config = TestConfig::load(&cli.testconfig)?;

    println!(
        "{} Running test cases from {} for {}",
        "I".cyan(),
        cli.testconfig.display(),
        config.banner().white().bold()
    );

    let region = cli.region.unwrap_or(settings.region);
    let max_concurrent = cli
        .max_concurrent
        .or(config.max_concurrent_sequences)
        .unwrap_or(settings.max_concurrent_sequences);

    tracing::debug!(
        region = %region,
        max_concurrent,
        sequences = config.sequences.len(),
        "Starting run"
    );

    let client = LexClient::new(&region).await;
    let summary = testing::run_test_config(
        &config,
        Arc::new(client),
        Arc::new(ConsoleReporter),
        max_concurrent,
    )
    .await?;

    testing::print_summary(&summary);
    Ok(summary)
}
