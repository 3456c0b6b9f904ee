//! testlexbot - regression test an Amazon Lex bot
//!
//! Runs the sequences of a test document against a live bot and reports
//! which ones passed.

use clap::Parser;
use lexbot_test::commands::Cli;
use lexbot_test::{cli, common::logging};

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    logging::init_cli(args.verbose);

    match cli::run(args).await {
        Ok(summary) if summary.all_passed() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
