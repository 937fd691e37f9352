//! Parameter helpers shared by the format implementations.
//!
//! Extra parameters reach formats as a string map (the CLI's `--extra-<key> <value>`), so every
//! format reads them the same way.

use crate::error::FormatError;
use std::collections::HashMap;

/// Read a boolean parameter. A key given without a value counts as `true`.
pub fn parse_bool_flag(
    options: &HashMap<String, String>,
    key: &str,
    default: bool,
) -> Result<bool, FormatError> {
    if let Some(value) = options.get(key) {
        if value.is_empty() {
            return Ok(true);
        }
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Ok(true),
            "false" | "0" | "no" | "n" => Ok(false),
            other => Err(FormatError::SerializationError(format!(
                "Invalid boolean value '{other}' for --extra-{key}"
            ))),
        }
    } else {
        Ok(default)
    }
}

/// Read an unsigned integer parameter.
pub fn parse_usize_option(
    options: &HashMap<String, String>,
    key: &str,
    default: usize,
) -> Result<usize, FormatError> {
    match options.get(key) {
        Some(value) => value.trim().parse().map_err(|_| {
            FormatError::SerializationError(format!(
                "Invalid number '{value}' for --extra-{key}"
            ))
        }),
        None => Ok(default),
    }
}

/// Reject parameters a format does not understand.
pub fn reject_unknown_options(
    format: &str,
    options: &HashMap<String, String>,
    known: &[&str],
) -> Result<(), FormatError> {
    let mut unknown: Vec<&str> = options
        .keys()
        .map(String::as_str)
        .filter(|key| !known.contains(key))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();
    Err(FormatError::NotSupported(format!(
        "Format '{format}' does not support parameter(s): {}",
        unknown.join(", ")
    )))
}
