//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ tree conversion.

mod export;
mod import;
mod line_format;
mod roundtrip;

use std::path::PathBuf;

/// Read a Markdown fixture from `tests/fixtures`.
pub(crate) fn read_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}
