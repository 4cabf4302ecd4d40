// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-summary library
//!
//! This module exports the configuration, module discovery, rendering and
//! pipeline of the `gotest-summary` binary for use in integration tests and
//! as a library.

pub mod config;
pub mod module;
pub mod render;
pub mod run;

pub use run::run;
