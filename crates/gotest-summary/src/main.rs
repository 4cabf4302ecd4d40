//! gotest-summary: job summaries for `go test -json` output
//!
//! Reads the event stream written by `go test -json` from a file or stdin and
//! writes a Markdown summary of the results per package.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use gotest_summary::config::Config;

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr so the summary can be piped
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    info!("Starting gotest-summary...");

    match gotest_summary::run(&config) {
        Ok(report) => {
            info!(totals = ?report.totals(), "Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to write summary: {e:#}");
            ExitCode::FAILURE
        }
    }
}
