//! JSON output formatting.

use serde::Serialize;

/// Format a value as a single line of JSON.
///
/// A value that cannot be serialized becomes an `{"error": ..}` object so
/// line-oriented consumers still get valid JSON.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|error| {
        serde_json::json!({ "error": error.to_string() }).to_string()
    })
}
