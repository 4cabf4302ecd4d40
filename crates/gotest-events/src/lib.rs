// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-events: `go test -json` event parsing and aggregation
//!
//! This library crate turns the line-delimited JSON stream written by
//! `go test -json` into typed events and folds them into a per-package
//! result tree (package, top-level test, subtest) with pass/fail/skip counts.
//!
//! # Example
//!
//! ```
//! use gotest_events::{aggregate, parse_test_events};
//!
//! let stdout = r#"{"Action":"run","Package":"p","Test":"TestA"}
//! {"Action":"pass","Package":"p","Test":"TestA"}
//! {"Action":"pass","Package":"p","Elapsed":0.01}"#;
//!
//! let report = aggregate(&parse_test_events(stdout));
//! assert_eq!(report.test_count(), 1);
//! ```

pub mod aggregate;
pub mod error;
pub mod event;
pub mod result;

pub use aggregate::{Report, aggregate};
pub use error::EventsError;
pub use event::{Action, Conclusion, Event, StreamingParser, parse_event, parse_test_events};
pub use result::{Conclusions, PackageResult, TestResult, TestResults};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::aggregate::{Report, aggregate};
    pub use crate::event::{Action, Conclusion, Event, parse_test_events};
    pub use crate::result::{Conclusions, PackageResult, TestResult};
}
