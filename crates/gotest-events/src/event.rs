// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `go test -json` event parsing
//!
//! This module decodes the line-delimited JSON stream written by `go test -json`
//! (the `test2json` schema) into classified [`Event`] values.
//!
//! Every line is decoded on its own. A line that does not match the schema is
//! skipped and logged at debug level; it never aborts the rest of the stream.
//!
//! # Example
//!
//! ```
//! use gotest_events::event::parse_test_events;
//!
//! let stdout = r#"{"Action":"pass","Package":"example.com/p","Test":"TestA"}
//! not json
//! {"Action":"pass","Package":"example.com/p","Elapsed":0.01}"#;
//!
//! let events = parse_test_events(stdout);
//! assert_eq!(events.len(), 2);
//! assert!(events[1].is_package_level());
//! ```

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EventsError;

/// Separator between a parent test name and its subtest name
pub const SUBTEST_SEPARATOR: char = '/';

/// Marker `go test` appends to the package summary line of a cached run
const CACHED_MARKER: &str = "\t(cached)";

// ============================================================================
// Actions
// ============================================================================

/// The `Action` of a test event
///
/// Unknown actions are kept verbatim in [`Action::Other`] and are never
/// conclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    /// The test binary is about to be executed
    Start,
    /// The test has started running
    Run,
    /// The test has been paused
    Pause,
    /// The test has continued running
    Cont,
    /// The benchmark printed log output but did not fail
    Bench,
    /// The test printed output
    Output,
    /// The test passed
    Pass,
    /// The test or benchmark failed
    Fail,
    /// The test was skipped or the package contained no tests
    Skip,
    /// Any action outside the documented set
    Other(String),
}

impl Action {
    /// The action as it appears on the wire
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Run => "run",
            Self::Pause => "pause",
            Self::Cont => "cont",
            Self::Bench => "bench",
            Self::Output => "output",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Other(other) => other,
        }
    }

    /// The conclusion this action represents, if it is conclusive
    #[must_use]
    pub fn conclusion(&self) -> Option<Conclusion> {
        match self {
            Self::Pass => Some(Conclusion::Pass),
            Self::Fail => Some(Conclusion::Fail),
            Self::Skip => Some(Conclusion::Skip),
            _ => None,
        }
    }

    /// Whether the action marks the end result of a test or package
    #[must_use]
    pub fn is_conclusive(&self) -> bool {
        self.conclusion().is_some()
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        match value {
            "start" => Self::Start,
            "run" => Self::Run,
            "pause" => Self::Pause,
            "cont" => Self::Cont,
            "bench" => Self::Bench,
            "output" => Self::Output,
            "pass" => Self::Pass,
            "fail" => Self::Fail,
            "skip" => Self::Skip,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conclusive action: the definitive outcome of a test or package
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conclusion {
    /// The test passed
    Pass,
    /// The test failed
    Fail,
    /// The test was skipped
    Skip,
}

impl Conclusion {
    /// All conclusions, in display order
    pub const ALL: [Conclusion; 3] = [Conclusion::Pass, Conclusion::Fail, Conclusion::Skip];

    /// The conclusion as it appears on the wire
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Events
// ============================================================================

/// One record as written by `go test -json`
///
/// Unknown keys are ignored. `Action` and `Package` are required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawEvent {
    time: Option<String>,
    action: String,
    package: String,
    test: Option<String>,
    elapsed: Option<f64>,
    output: Option<String>,
}

/// Flags derived from a single event's own fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
struct Classification {
    is_subtest: bool,
    is_package_level: bool,
    is_conclusive: bool,
    is_cached: bool,
}

impl Classification {
    fn of(action: &Action, test: Option<&str>, output: Option<&str>) -> Self {
        Self {
            is_subtest: test.is_some_and(|t| t.contains(SUBTEST_SEPARATOR)),
            is_package_level: test.is_none(),
            is_conclusive: action.is_conclusive(),
            is_cached: output.is_some_and(|o| o.contains(CACHED_MARKER)),
        }
    }
}

/// A parsed and classified test event
///
/// Events are immutable once built: the classification flags are computed
/// from the event's own fields at construction and never change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    time: Option<DateTime<FixedOffset>>,
    action: Action,
    package: String,
    test: Option<String>,
    elapsed: Option<f64>,
    output: Option<String>,
    #[serde(flatten)]
    flags: Classification,
}

impl Event {
    /// Create an event with no time, elapsed or output
    #[must_use]
    pub fn new(action: impl Into<Action>, package: impl Into<String>, test: Option<&str>) -> Self {
        let action = action.into();
        let test = test.map(str::to_string);
        let flags = Classification::of(&action, test.as_deref(), None);
        Self {
            time: None,
            action,
            package: package.into(),
            test,
            elapsed: None,
            output: None,
            flags,
        }
    }

    /// Attach output text
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self.flags = Classification::of(&self.action, self.test.as_deref(), self.output.as_deref());
        self
    }

    /// Attach an elapsed duration in seconds
    #[must_use]
    pub fn with_elapsed(mut self, elapsed: f64) -> Self {
        self.elapsed = valid_elapsed(elapsed);
        self
    }

    /// Attach a timestamp
    #[must_use]
    pub fn with_time(mut self, time: DateTime<FixedOffset>) -> Self {
        self.time = Some(time);
        self
    }

    /// Timestamp of the event, if reported
    #[must_use]
    pub fn time(&self) -> Option<DateTime<FixedOffset>> {
        self.time
    }

    /// The event action
    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The owning package
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Full test name, absent for package-level events
    #[must_use]
    pub fn test(&self) -> Option<&str> {
        self.test.as_deref()
    }

    /// Elapsed seconds, if reported
    #[must_use]
    pub fn elapsed(&self) -> Option<f64> {
        self.elapsed
    }

    /// Output fragment, if any
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// The conclusion of a conclusive event
    #[must_use]
    pub fn conclusion(&self) -> Option<Conclusion> {
        self.action.conclusion()
    }

    /// The test name contains a subtest separator
    #[must_use]
    pub fn is_subtest(&self) -> bool {
        self.flags.is_subtest
    }

    /// The event has no test name and belongs to the package itself
    #[must_use]
    pub fn is_package_level(&self) -> bool {
        self.flags.is_package_level
    }

    /// The action is one of pass, fail or skip
    #[must_use]
    pub fn is_conclusive(&self) -> bool {
        self.flags.is_conclusive
    }

    /// The output reports a cached package result
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.flags.is_cached
    }

    /// Segments of the test name, split on `/`
    ///
    /// Test names may nest to any depth, e.g. `TestA/case/inner`.
    pub fn test_path(&self) -> impl Iterator<Item = &str> {
        self.test
            .as_deref()
            .into_iter()
            .flat_map(|t| t.split(SUBTEST_SEPARATOR))
    }

    /// Top-level test name of a subtest
    ///
    /// Only the first segment is returned: aggregation builds two levels
    /// (test and subtest) no matter how deep the name nests.
    #[must_use]
    pub fn parent_test(&self) -> Option<&str> {
        if !self.is_subtest() {
            return None;
        }
        self.test
            .as_deref()
            .and_then(|t| t.split_once(SUBTEST_SEPARATOR))
            .map(|(parent, _)| parent)
    }
}

impl TryFrom<RawEvent> for Event {
    type Error = EventsError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        if raw.action.is_empty() {
            return Err(EventsError::MissingField { field: "Action" });
        }
        if raw.package.is_empty() {
            return Err(EventsError::MissingField { field: "Package" });
        }

        let time = raw.time.and_then(|t| match DateTime::parse_from_rfc3339(&t) {
            Ok(time) => Some(time),
            Err(e) => {
                debug!(time = %t, error = %e, "Ignoring unparsable event time");
                None
            }
        });

        let action = Action::from(raw.action);
        let flags = Classification::of(&action, raw.test.as_deref(), raw.output.as_deref());

        Ok(Self {
            time,
            action,
            package: raw.package,
            test: raw.test,
            elapsed: raw.elapsed.and_then(valid_elapsed),
            output: raw.output,
            flags,
        })
    }
}

fn valid_elapsed(elapsed: f64) -> Option<f64> {
    (elapsed.is_finite() && elapsed >= 0.0).then_some(elapsed)
}

// ============================================================================
// Parsing Functions
// ============================================================================

/// Parse a single `go test -json` line
///
/// # Errors
///
/// Returns `EventsError::JsonParse` if the line is not a JSON object with
/// string `Action` and `Package` fields, `EventsError::MissingField` if either
/// is empty, and `EventsError::InvalidFormat` for a blank line.
pub fn parse_event(line: &str) -> Result<Event, EventsError> {
    if line.trim().is_empty() {
        return Err(EventsError::InvalidFormat {
            message: "empty line".to_string(),
        });
    }
    let raw: RawEvent = serde_json::from_str(line)?;
    Event::try_from(raw)
}

/// Parse the raw stdout of `go test -json` into events
///
/// Input order is preserved. Blank lines are discarded and lines that fail to
/// decode are skipped.
#[must_use]
pub fn parse_test_events(stdout: &str) -> Vec<Event> {
    let mut parser = StreamingParser::new();
    for line in stdout.lines() {
        parser.process_line(line);
    }
    parser.into_events()
}

// ============================================================================
// Streaming Parser for incremental parsing
// ============================================================================

/// A streaming parser for `go test -json` output
#[derive(Debug, Default)]
pub struct StreamingParser {
    events: Vec<Event>,
    line_number: usize,
    skipped: usize,
}

impl StreamingParser {
    /// Create a new streaming parser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single line of output
    ///
    /// Returns the parsed event, or `None` if the line was blank or skipped.
    pub fn process_line(&mut self, line: &str) -> Option<&Event> {
        self.line_number += 1;
        if line.trim().is_empty() {
            return None;
        }

        match parse_event(line) {
            Ok(event) => {
                self.events.push(event);
                self.events.last()
            }
            Err(e) => {
                self.skipped += 1;
                debug!(line_number = self.line_number, line = %line, error = %e, "Unable to parse line");
                None
            }
        }
    }

    /// Events parsed so far, in input order
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of non-blank lines that were skipped
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Finish parsing and return the events
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
