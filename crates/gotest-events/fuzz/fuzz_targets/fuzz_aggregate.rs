// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for aggregation
//!
//! Aggregating any parsed stream must never panic and must conserve counts.

#![no_main]

use libfuzzer_sys::fuzz_target;

use gotest_events::{aggregate, parse_test_events};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let events = parse_test_events(input);
        let report = aggregate(&events);

        let sum: usize = report.packages().iter().map(|p| p.test_count()).sum();
        assert_eq!(report.test_count(), sum);
        assert_eq!(report, aggregate(&events));
    }
});
