//! Text normalisation helpers.

use serde::Serialize;

/// Collapse every run of whitespace to a single space and trim the ends.
///
/// ```
/// use slidesmith::common::text::clean_text;
/// assert_eq!(clean_text("  Rust\n\t is   fast "), "Rust is fast");
/// assert_eq!(clean_text(""), "");
/// ```
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Two-space indented JSON, non-ASCII kept as-is.
pub fn pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
