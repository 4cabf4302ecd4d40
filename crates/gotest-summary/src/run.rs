// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The summary pipeline
//!
//! Reads a `go test -json` stream, aggregates it, renders the summary and
//! appends it to the configured destination.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use gotest_events::{Report, aggregate, parse_test_events};
use tracing::{debug, info};

use crate::config::{Config, OutputFormat};
use crate::module::find_module_name;
use crate::render::Renderer;

/// Run the pipeline for `config`, returning the aggregated report
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the input cannot be
/// read, or the summary cannot be written.
pub fn run(config: &Config) -> Result<Report> {
    config.validate()?;

    let stdout = read_input(config.from_json_file.as_deref())?;
    let events = parse_test_events(&stdout);
    info!(events = events.len(), "Parsed test events");

    let report = aggregate(&events);
    info!(
        packages = report.packages().len(),
        tests = report.test_count(),
        "Aggregated test results"
    );

    let summary = match config.format {
        OutputFormat::Json => {
            Some(serde_json::to_string_pretty(&report).context("Failed to serialize report")?)
        }
        OutputFormat::Markdown => {
            let stderr = match config.stderr_file {
                Some(ref path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read stderr file {}", path.display()))?,
                None => String::new(),
            };
            let module_name = find_module_name(config.module_directory());
            let omit = config.omit_options();
            Renderer::new(&report)
                .with_module_name(module_name.as_deref())
                .with_stderr(&stderr)
                .with_omit(&omit)
                .render()
        }
    };

    match summary {
        Some(summary) => write_summary(config.output.as_deref(), &summary)?,
        None => debug!("Nothing to write"),
    }

    Ok(report)
}

/// Read the event stream from a file, or stdin when no file is given
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Append the summary to a file, or print it to stdout
fn write_summary(path: Option<&Path>, summary: &str) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            writeln!(file, "{summary}")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Summary written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{summary}").context("Failed to write stdout")?;
        }
    }
    Ok(())
}
