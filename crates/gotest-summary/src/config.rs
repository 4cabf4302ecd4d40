// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for gotest-summary
//!
//! This module provides the command line and environment configuration:
//! where the event stream comes from, where the summary goes, which sections
//! to leave out, and logging options.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::warn;

/// Summarize `go test -json` output as a job summary
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gotest-summary")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Read the `go test -json` stream from this file
    ///
    /// The stream is read from stdin when no file is given.
    #[arg(short = 'f', long, env = "GOTEST_SUMMARY_FROM_JSON_FILE")]
    pub from_json_file: Option<PathBuf>,

    /// File holding the captured stderr of the test run
    #[arg(long, env = "GOTEST_SUMMARY_STDERR_FILE")]
    pub stderr_file: Option<PathBuf>,

    /// Directory containing the module's go.mod
    ///
    /// Defaults to the current working directory.
    #[arg(short, long, env = "GOTEST_SUMMARY_MODULE_DIRECTORY")]
    pub module_directory: Option<PathBuf>,

    /// Sections of the summary to leave out
    ///
    /// Any of: skipped, successful, pie, pkg-output, pkg-tests, stderr.
    /// Values may be separated by any whitespace, including newlines, and
    /// unknown values are ignored.
    #[arg(long, num_args = 1.., env = "GOTEST_SUMMARY_OMIT")]
    pub omit: Vec<String>,

    /// Append the summary to this file
    ///
    /// Defaults to the GitHub job summary file when running in Actions,
    /// and to stdout otherwise.
    #[arg(short, long, env = "GITHUB_STEP_SUMMARY")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the summary.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Sections that can be left out of the summary
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OmitOption {
    /// Packages without any tests
    Skipped,
    /// Packages whose tests all passed
    Successful,
    /// The pie chart
    Pie,
    /// Per-package test output
    #[value(name = "pkg-output")]
    PackageOutput,
    /// Per-package test list
    #[value(name = "pkg-tests")]
    PackageTests,
    /// Standard error of the test run
    Stderr,
}

/// Summary output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Markdown with embedded HTML, for job summaries
    #[default]
    Markdown,
    /// The aggregated report as JSON
    Json,
}

impl Config {
    /// Get the module directory, using the current directory as default
    #[must_use]
    pub fn module_directory(&self) -> PathBuf {
        self.module_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Sections to leave out, parsed from the `--omit` values
    ///
    /// Unknown values are logged and skipped.
    #[must_use]
    pub fn omit_options(&self) -> Vec<OmitOption> {
        let mut options = Vec::new();
        for value in self.omit.iter().flat_map(|v| v.split_whitespace()) {
            match OmitOption::from_str(value, false) {
                Ok(option) if !options.contains(&option) => options.push(option),
                Ok(_) => {}
                Err(_) => warn!(option = value, "Ignoring unknown omit option"),
            }
        }
        options
    }

    /// Whether a section is left out
    #[must_use]
    pub fn omits(&self, option: OmitOption) -> bool {
        self.omit_options().contains(&option)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input file is specified but doesn't exist
    /// - The module directory is specified but isn't a directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.from_json_file {
            if !path.is_file() {
                return Err(ConfigError::InputFileNotFound(path.clone()));
            }
        }

        if let Some(ref path) = self.stderr_file {
            if !path.is_file() {
                return Err(ConfigError::StderrFileNotFound(path.clone()));
            }
        }

        if let Some(ref dir) = self.module_directory {
            if !dir.exists() {
                return Err(ConfigError::ModuleDirectoryNotFound(dir.clone()));
            }
            if !dir.is_dir() {
                return Err(ConfigError::ModuleDirectoryNotDirectory(dir.clone()));
            }
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Event stream file not found
    #[error("Input file not found: {0}")]
    InputFileNotFound(PathBuf),

    /// Stderr file not found
    #[error("Stderr file not found: {0}")]
    StderrFileNotFound(PathBuf),

    /// Module directory not found
    #[error("Module directory not found: {0}")]
    ModuleDirectoryNotFound(PathBuf),

    /// Module directory is not a directory
    #[error("Module directory is not a directory: {0}")]
    ModuleDirectoryNotDirectory(PathBuf),
}
