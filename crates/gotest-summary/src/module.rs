// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Go module discovery
//!
//! The module path declared in `go.mod` labels the main package of the
//! summary. A missing or unreadable `go.mod` is not an error for the
//! summary as a whole.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Name of the Go module manifest
pub const GO_MOD: &str = "go.mod";

/// Errors that can occur while reading the module name
#[derive(Debug, Error)]
pub enum ModuleError {
    /// The manifest could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path of the manifest
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The manifest has no module directive
    #[error("No module directive found in {0}")]
    MissingDirective(PathBuf),
}

/// Extract the module path from the contents of a `go.mod` file
#[must_use]
pub fn parse_module_name(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let name = rest.split("//").next().unwrap_or(rest).trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// Read the module path from `<dir>/go.mod`
///
/// # Errors
///
/// Returns `ModuleError::Read` if the file cannot be read and
/// `ModuleError::MissingDirective` if it declares no module.
pub fn read_module_name(dir: impl AsRef<Path>) -> Result<String, ModuleError> {
    let path = dir.as_ref().join(GO_MOD);
    let contents = std::fs::read_to_string(&path).map_err(|source| ModuleError::Read {
        path: path.clone(),
        source,
    })?;
    parse_module_name(&contents).ok_or(ModuleError::MissingDirective(path))
}

/// Find the module path for `dir`, if it has a usable `go.mod`
#[must_use]
pub fn find_module_name(dir: impl AsRef<Path>) -> Option<String> {
    match read_module_name(dir) {
        Ok(name) => Some(name),
        Err(e) => {
            debug!(error = %e, "Unable to parse module from go.mod");
            None
        }
    }
}
