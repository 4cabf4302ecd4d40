// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for `go test -json` stream parsing
//!
//! `parse_test_events` must never panic and must keep exactly the lines that
//! decode on their own.

#![no_main]

use libfuzzer_sys::fuzz_target;

use gotest_events::{StreamingParser, parse_event, parse_test_events};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let events = parse_test_events(input);

        let valid = input.lines().filter(|l| parse_event(l).is_ok()).count();
        assert_eq!(events.len(), valid);

        let mut parser = StreamingParser::new();
        for line in input.lines() {
            let _ = parser.process_line(line);
        }
        assert_eq!(parser.into_events(), events);
    }
});
