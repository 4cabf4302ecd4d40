// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gotest-events

use thiserror::Error;

/// Errors that can occur while decoding a single event line
#[derive(Debug, Error)]
pub enum EventsError {
    /// Error parsing JSON
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A required field was present but empty
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the field as it appears in the event record
        field: &'static str,
    },

    /// Invalid event record format
    #[error("Invalid event format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },
}
