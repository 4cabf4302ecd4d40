// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Aggregation of an event stream into per-package results
//!
//! # Example
//!
//! ```
//! use gotest_events::aggregate::aggregate;
//! use gotest_events::event::parse_test_events;
//!
//! let stdout = r#"{"Action":"pass","Package":"p","Test":"T"}
//! {"Action":"fail","Package":"p","Test":"T/S1"}
//! {"Action":"pass","Package":"p"}"#;
//!
//! let report = aggregate(&parse_test_events(stdout));
//! assert_eq!(report.packages().len(), 1);
//! assert_eq!(report.totals().pass, 2);
//! assert_eq!(report.totals().fail, 1);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::event::Event;
use crate::result::{Conclusions, PackageResult};

/// Results of every package in a run, plus totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    packages: Vec<PackageResult>,
    totals: Conclusions,
}

impl Report {
    /// Package results, ordered by package identifier
    #[must_use]
    pub fn packages(&self) -> &[PackageResult] {
        &self.packages
    }

    /// Conclusion counts summed over all packages
    #[must_use]
    pub fn totals(&self) -> Conclusions {
        self.totals
    }

    /// Total number of conclusive test and subtest events
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.totals.total()
    }

    /// Whether no package reported a verdict
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Look up a package result by identifier
    #[must_use]
    pub fn package(&self, package: &str) -> Option<&PackageResult> {
        self.packages
            .binary_search_by(|p| p.package().cmp(package))
            .ok()
            .map(|idx| &self.packages[idx])
    }
}

/// Aggregate an event stream into one result per package
///
/// Every package-level conclusive event is a package verdict. Packages are
/// ordered by identifier. If a package reports more than one verdict, the
/// last one in stream order is kept and the duplicate is logged.
///
/// The result depends only on `events`, so aggregating the same slice twice
/// yields identical reports.
#[must_use]
pub fn aggregate(events: &[Event]) -> Report {
    let mut verdicts: BTreeMap<&str, &Event> = BTreeMap::new();
    for event in events
        .iter()
        .filter(|e| e.is_conclusive() && e.is_package_level())
    {
        if let Some(previous) = verdicts.insert(event.package(), event) {
            warn!(
                package = %event.package(),
                previous = %previous.action(),
                current = %event.action(),
                "Package reported more than one verdict, keeping the last"
            );
        }
    }

    let packages: Vec<PackageResult> = verdicts
        .into_values()
        .map(|verdict| PackageResult::new(verdict.clone(), events))
        .collect();

    let totals = packages.iter().map(PackageResult::conclusions).sum();

    Report { packages, totals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Action, Conclusion, parse_test_events};
    use similar_asserts::assert_eq;

    #[test]
    fn test_concrete_scenario() {
        let stdout = r#"{"Action":"pass","Package":"p","Test":"T"}
{"Action":"fail","Package":"p","Test":"T/S1"}
{"Action":"pass","Package":"p"}"#;

        let report = aggregate(&parse_test_events(stdout));
        let package = report.package("p").expect("package p");

        assert_eq!(
            package.conclusions(),
            Conclusions {
                pass: 2,
                fail: 1,
                skip: 0
            }
        );
        assert_eq!(
            serde_json::to_value(package.tests()).unwrap(),
            serde_json::json!({
                "T": {"conclusion": "pass", "subtests": {"T/S1": {"conclusion": "fail"}}}
            })
        );
    }

    #[test]
    fn test_packages_sorted_by_identifier() {
        let events = vec![
            Event::new(Action::Pass, "zeta", None),
            Event::new(Action::Fail, "alpha", None),
            Event::new(Action::Skip, "mid", None),
        ];
        let report = aggregate(&events);
        let names: Vec<&str> = report.packages().iter().map(PackageResult::package).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_duplicate_verdict_keeps_last() {
        let events = vec![
            Event::new(Action::Pass, "p", Some("T")),
            Event::new(Action::Fail, "p", None),
            Event::new(Action::Pass, "p", None),
        ];
        let report = aggregate(&events);

        assert_eq!(report.packages().len(), 1);
        assert_eq!(report.packages()[0].conclusion(), Some(Conclusion::Pass));
        assert_eq!(report.totals().pass, 1);
    }

    #[test]
    fn test_packages_without_verdict_are_ignored() {
        let events = vec![
            Event::new(Action::Run, "orphan", Some("T")),
            Event::new(Action::Pass, "orphan", Some("T")),
            Event::new(Action::Output, "orphan", None).with_output("building\n"),
        ];
        let report = aggregate(&events);

        assert!(report.is_empty());
        assert_eq!(report.totals(), Conclusions::default());
    }

    #[test]
    fn test_totals_sum_packages() {
        let events = vec![
            Event::new(Action::Pass, "a", Some("T1")),
            Event::new(Action::Fail, "a", Some("T2")),
            Event::new(Action::Fail, "a", None),
            Event::new(Action::Skip, "b", Some("T1")),
            Event::new(Action::Pass, "b", Some("T2/x")),
            Event::new(Action::Pass, "b", None),
            Event::new(Action::Skip, "c", None),
        ];
        let report = aggregate(&events);

        assert_eq!(
            report.totals(),
            Conclusions {
                pass: 2,
                fail: 1,
                skip: 1
            }
        );
        assert_eq!(report.test_count(), 4);
        assert!(!report.package("c").expect("package c").has_tests());
        assert!(report.package("missing").is_none());
    }

    #[test]
    fn test_empty_input() {
        let report = aggregate(&[]);
        assert!(report.is_empty());
        assert_eq!(report.test_count(), 0);
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"packages":[],"totals":{"pass":0,"fail":0,"skip":0}}"#
        );
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let events = vec![
            Event::new(Action::Pass, "p", Some("T/a")),
            Event::new(Action::Pass, "p", Some("T")),
            Event::new(Action::Pass, "p", None),
        ];
        assert_eq!(aggregate(&events), aggregate(&events));
    }
}
