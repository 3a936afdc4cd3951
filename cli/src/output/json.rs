//! Documents printed to stdout under `--json`.

use anyhow::{Context, Result};
use serde::Serialize;

/// Printed instead of `Error: ...` when a command fails in JSON mode.
#[derive(Serialize)]
struct ErrorDocument<'a> {
    error: bool,
    message: &'a str,
    /// One of the stable driver error codes, or `error`.
    code: &'a str,
}

/// `{"error": true, "message": ..., "code": ...}`, pretty-printed.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    format(&ErrorDocument {
        error: true,
        message,
        code,
    })
}

/// Pretty-print any serializable value.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serializing JSON output")
}
