//! XML text helpers shared by the OPC and PresentationML writers.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

static XML_ESCAPER: Lazy<Option<AhoCorasick>> =
    Lazy::new(|| AhoCorasick::new(["&", "<", ">", "\"", "'"]).ok());

const REPLACEMENTS: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

/// Escape XML special characters for use in text or attribute values.
///
/// Control characters XML 1.0 cannot carry are dropped.
///
/// # Examples
///
/// ```
/// use slidesmith::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<b>\"hi\"</b>"), "&lt;b&gt;&quot;hi&quot;&lt;/b&gt;");
/// ```
pub fn escape_xml(s: &str) -> String {
    let cleaned;
    let s = if s.chars().any(is_forbidden) {
        cleaned = s.chars().filter(|c| !is_forbidden(*c)).collect::<String>();
        cleaned.as_str()
    } else {
        s
    };

    match XML_ESCAPER.as_ref() {
        Some(escaper) => escaper.replace_all(s, &REPLACEMENTS),
        None => s
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    }
}

/// Character named by an entity reference body (`amp`, `#38`, `#x26`).
///
/// `None` for entities XML does not predefine.
pub fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
                .map(|hex| u32::from_str_radix(hex, 16))
                .or_else(|| name.strip_prefix('#').map(|dec| dec.parse::<u32>()))?
                .ok()?;
            char::from_u32(code)
        },
    }
}

#[inline]
fn is_forbidden(c: char) -> bool {
    (c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')) || matches!(c, '\u{FFFE}' | '\u{FFFF}')
}
