// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Per-package result trees
//!
//! A [`PackageResult`] folds the events of one package into a two-level tree:
//! top-level tests, each with the subtests reported under it.

use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{Conclusion, Event};

/// Test results keyed by test name
///
/// Keys iterate in lexicographic order, which is also the display order.
pub type TestResults = BTreeMap<String, TestResult>;

/// Counts of pass, fail and skip conclusions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conclusions {
    /// Passed tests
    pub pass: usize,
    /// Failed tests
    pub fail: usize,
    /// Skipped tests
    pub skip: usize,
}

impl Conclusions {
    /// Count one more occurrence of `conclusion`
    pub fn record(&mut self, conclusion: Conclusion) {
        *self.get_mut(conclusion) += 1;
    }

    /// Count for a single conclusion
    #[must_use]
    pub fn get(&self, conclusion: Conclusion) -> usize {
        match conclusion {
            Conclusion::Pass => self.pass,
            Conclusion::Fail => self.fail,
            Conclusion::Skip => self.skip,
        }
    }

    fn get_mut(&mut self, conclusion: Conclusion) -> &mut usize {
        match conclusion {
            Conclusion::Pass => &mut self.pass,
            Conclusion::Fail => &mut self.fail,
            Conclusion::Skip => &mut self.skip,
        }
    }

    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> usize {
        self.pass + self.fail + self.skip
    }
}

impl Add for Conclusions {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            pass: self.pass + rhs.pass,
            fail: self.fail + rhs.fail,
            skip: self.skip + rhs.skip,
        }
    }
}

impl Sum for Conclusions {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, c| acc + c)
    }
}

impl<'a> Sum<&'a Conclusions> for Conclusions {
    fn sum<I: Iterator<Item = &'a Conclusions>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Result of a single test and the subtests reported under it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// The test's own conclusion
    ///
    /// `None` when only subtests of this test reported a conclusion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<Conclusion>,
    /// Subtests keyed by their full name (`Parent/Child`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subtests: TestResults,
}

impl TestResult {
    /// A result with a conclusion and no subtests
    #[must_use]
    pub fn concluded(conclusion: Conclusion) -> Self {
        Self {
            conclusion: Some(conclusion),
            subtests: TestResults::new(),
        }
    }

    /// The conclusion to display for this test
    ///
    /// Falls back to the subtests when the test has no conclusion of its own:
    /// any failure fails, otherwise any pass passes, otherwise skip.
    #[must_use]
    pub fn effective_conclusion(&self) -> Option<Conclusion> {
        if self.conclusion.is_some() {
            return self.conclusion;
        }

        let children: Vec<Conclusion> = self
            .subtests
            .values()
            .filter_map(TestResult::effective_conclusion)
            .collect();

        if children.contains(&Conclusion::Fail) {
            Some(Conclusion::Fail)
        } else if children.contains(&Conclusion::Pass) {
            Some(Conclusion::Pass)
        } else if children.contains(&Conclusion::Skip) {
            Some(Conclusion::Skip)
        } else {
            None
        }
    }
}

/// Aggregated results of one package
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageResult {
    package_event: Event,
    events: Vec<Event>,
    tests: TestResults,
    conclusions: Conclusions,
}

impl PackageResult {
    /// Build the result tree of the package that `package_event` concludes
    ///
    /// `events` may be the full event stream: only the non-package-level
    /// events of the same package are retained, in their original order.
    #[must_use]
    pub fn new(package_event: Event, events: &[Event]) -> Self {
        let events: Vec<Event> = events
            .iter()
            .filter(|e| !e.is_package_level() && e.package() == package_event.package())
            .cloned()
            .collect();

        let mut result = Self {
            package_event,
            events,
            tests: TestResults::new(),
            conclusions: Conclusions::default(),
        };
        result.events_to_results();
        result
    }

    /// Record every conclusive event into the test tree and the counts
    fn events_to_results(&mut self) {
        for event in &self.events {
            let (Some(conclusion), Some(test)) = (event.conclusion(), event.test()) else {
                continue;
            };

            self.conclusions.record(conclusion);

            match event.parent_test() {
                Some(parent) => {
                    self.tests
                        .entry(parent.to_string())
                        .or_default()
                        .subtests
                        .insert(test.to_string(), TestResult::concluded(conclusion));
                }
                None => {
                    self.tests.entry(test.to_string()).or_default().conclusion = Some(conclusion);
                }
            }
        }

        for (name, result) in &self.tests {
            if result.conclusion.is_none() {
                debug!(
                    package = %self.package_event.package(),
                    test = %name,
                    "Test has subtest conclusions but none of its own"
                );
            }
        }
    }

    /// The package identifier
    #[must_use]
    pub fn package(&self) -> &str {
        self.package_event.package()
    }

    /// The package-level conclusive event
    #[must_use]
    pub fn package_event(&self) -> &Event {
        &self.package_event
    }

    /// The package's verdict
    #[must_use]
    pub fn conclusion(&self) -> Option<Conclusion> {
        self.package_event.conclusion()
    }

    /// Retained test-level events, in stream order
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Top-level tests keyed by name
    #[must_use]
    pub fn tests(&self) -> &TestResults {
        &self.tests
    }

    /// Conclusion counts across tests and subtests
    #[must_use]
    pub fn conclusions(&self) -> Conclusions {
        self.conclusions
    }

    /// Number of conclusive test and subtest events
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.conclusions.total()
    }

    /// Whether any test reported a conclusion
    #[must_use]
    pub fn has_tests(&self) -> bool {
        self.test_count() != 0
    }

    /// No test was skipped or failed
    #[must_use]
    pub fn only_successful_tests(&self) -> bool {
        self.conclusions.skip == 0 && self.conclusions.fail == 0
    }

    /// Elapsed seconds reported for the package, if any
    #[must_use]
    pub fn elapsed(&self) -> Option<f64> {
        self.package_event.elapsed()
    }

    /// Output of all retained events, concatenated in stream order
    #[must_use]
    pub fn output(&self) -> String {
        self.events.iter().filter_map(Event::output).collect()
    }
}
