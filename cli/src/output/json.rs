//! JSON output helpers.
//!
//! `--json` prints the provisioning report on success and an error object
//! on failure. Nothing else goes to stdout in that mode.

use anyhow::{Context, Result};

use crate::domain::{ProvisionError, ProvisionReport};

/// Error code used when a failure is not a `ProvisionError`.
pub const INTERNAL_ERROR_CODE: &str = "internal";

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a fatal error, using the typed error code when there is one.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_failure(err: &anyhow::Error) -> Result<String> {
    let code = err
        .downcast_ref::<ProvisionError>()
        .map_or(INTERNAL_ERROR_CODE, ProvisionError::code);
    format_error(&format!("{err:#}"), code)
}

/// Format a successful run.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(report: &ProvisionReport) -> Result<String> {
    let obj = serde_json::json!({
        "error": false,
        "changes": report.changes(),
        "report": report,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
