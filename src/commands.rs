//! CLI argument definitions
//!
//! Defines the clap arguments for the test runner.

use clap::builder::RangedU64ValueParser;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "testlexbot", about = "Regression test an Amazon Lex bot")]
#[command(version, long_about = None)]
#[command(after_help = "For example:  testlexbot test/CoffeeBot-main.json")]
pub struct Cli {
    /// Path to the test configuration (JSON, or YAML with a .yaml/.yml extension)
    pub testconfig: PathBuf,

    /// Maximum number of sequences running at the same time
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_concurrent: Option<usize>,

    /// AWS region hosting the bot (default: from settings, else us-east-1)
    #[arg(long)]
    pub region: Option<String>,

    /// Verbose output
    #[arg(long, short)]
    pub verbose: bool,
}
