// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Property-based tests for gotest-events
//!
//! These tests use proptest to verify that parsing and aggregation invariants
//! hold for arbitrary event streams.

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use gotest_events::prelude::*;
use gotest_events::parse_event;

// ============================================================================
// Strategies
// ============================================================================

fn arbitrary_action() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("start".to_string()),
        Just("run".to_string()),
        Just("pause".to_string()),
        Just("cont".to_string()),
        Just("bench".to_string()),
        Just("output".to_string()),
        Just("pass".to_string()),
        Just("fail".to_string()),
        Just("skip".to_string()),
        "[a-z]{1,8}".prop_map(|s| s),
    ]
}

fn arbitrary_package() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("example.com/a".to_string()),
        Just("example.com/b".to_string()),
        Just("example.com/a/sub".to_string()),
        Just("z".to_string()),
    ]
}

fn arbitrary_test() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("TestA".to_string())),
        Just(Some("TestB".to_string())),
        Just(Some("TestA/one".to_string())),
        Just(Some("TestA/two".to_string())),
        Just(Some("TestC/x/y".to_string())),
        "Test[A-Z][a-z]{0,4}(/[a-z]{1,3}){0,2}".prop_map(Some),
    ]
}

fn arbitrary_output() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("=== RUN   TestA\n".to_string())),
        Just(Some("ok  \texample.com/a\t(cached)\n".to_string())),
        Just(Some("ok  \texample.com/a (cached)\n".to_string())),
        ".{0,30}".prop_map(Some),
    ]
}

/// A single `go test -json` line built from arbitrary fields
fn arbitrary_record() -> impl Strategy<Value = Value> {
    (
        arbitrary_action(),
        arbitrary_package(),
        arbitrary_test(),
        arbitrary_output(),
        proptest::option::of(0.0f64..10.0),
    )
        .prop_map(|(action, package, test, output, elapsed)| {
            let mut record = Map::new();
            record.insert("Action".to_string(), json!(action));
            record.insert("Package".to_string(), json!(package));
            if let Some(test) = test {
                record.insert("Test".to_string(), json!(test));
            }
            if let Some(output) = output {
                record.insert("Output".to_string(), json!(output));
            }
            if let Some(elapsed) = elapsed {
                record.insert("Elapsed".to_string(), json!(elapsed));
            }
            Value::Object(record)
        })
}

fn arbitrary_stream() -> impl Strategy<Value = Vec<Value>> {
    proptest::collection::vec(arbitrary_record(), 0..60)
}

fn to_stdout(records: &[Value]) -> String {
    records
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_classification_is_pure(record in arbitrary_record()) {
        let event = parse_event(&record.to_string()).expect("generated records are valid");

        let action = record["Action"].as_str().unwrap_or_default();
        let test = record.get("Test").and_then(Value::as_str);
        let output = record.get("Output").and_then(Value::as_str);

        prop_assert_eq!(event.is_conclusive(), matches!(action, "pass" | "fail" | "skip"));
        prop_assert_eq!(event.is_package_level(), test.is_none());
        prop_assert_eq!(event.is_subtest(), test.is_some_and(|t| t.contains('/')));
        prop_assert_eq!(event.is_cached(), output.is_some_and(|o| o.contains("\t(cached)")));
    }

    #[test]
    fn prop_malformed_lines_are_skipped(
        records in arbitrary_stream(),
        garbage in "[^\n{}]{1,20}",
        position in any::<prop::sample::Index>(),
    ) {
        let mut lines: Vec<String> = records.iter().map(Value::to_string).collect();
        let at = if lines.is_empty() { 0 } else { position.index(lines.len() + 1) };
        lines.insert(at, format!("{{{garbage}"));

        let events = parse_test_events(&lines.join("\n"));
        let expected = parse_test_events(&to_stdout(&records));

        prop_assert_eq!(events.len(), records.len());
        prop_assert_eq!(events, expected);
    }

    #[test]
    fn prop_aggregation_is_idempotent(records in arbitrary_stream()) {
        let events = parse_test_events(&to_stdout(&records));

        let first = serde_json::to_string(&aggregate(&events)).expect("serialize");
        let second = serde_json::to_string(&aggregate(&events)).expect("serialize");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_counts_are_conserved(records in arbitrary_stream()) {
        let events = parse_test_events(&to_stdout(&records));
        let report = aggregate(&events);

        for package in report.packages() {
            let expected = events
                .iter()
                .filter(|e| {
                    e.package() == package.package() && e.is_conclusive() && !e.is_package_level()
                })
                .count();
            prop_assert_eq!(package.conclusions().total(), expected);
        }
    }

    #[test]
    fn prop_totals_are_sum_of_packages(records in arbitrary_stream()) {
        let report = aggregate(&parse_test_events(&to_stdout(&records)));

        let mut expected = Conclusions::default();
        for package in report.packages() {
            expected.pass += package.conclusions().pass;
            expected.fail += package.conclusions().fail;
            expected.skip += package.conclusions().skip;
        }
        prop_assert_eq!(report.totals(), expected);
    }

    #[test]
    fn prop_packages_are_sorted_and_unique(records in arbitrary_stream()) {
        let report = aggregate(&parse_test_events(&to_stdout(&records)));
        let names: Vec<&str> = report.packages().iter().map(PackageResult::package).collect();

        prop_assert!(names.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_subtests_are_prefixed_by_parent(records in arbitrary_stream()) {
        let report = aggregate(&parse_test_events(&to_stdout(&records)));

        for package in report.packages() {
            for (name, test) in package.tests() {
                prop_assert!(!name.contains('/'));
                let prefix = format!("{name}/");
                for subtest in test.subtests.keys() {
                    prop_assert!(subtest.starts_with(&prefix));
                }
            }
        }
    }

    #[test]
    fn prop_output_preserves_stream_order(records in arbitrary_stream()) {
        let events = parse_test_events(&to_stdout(&records));
        let report = aggregate(&events);

        for package in report.packages() {
            let expected: String = events
                .iter()
                .filter(|e| e.package() == package.package() && !e.is_package_level())
                .filter_map(Event::output)
                .collect();
            prop_assert_eq!(package.output(), expected);
        }
    }
}
