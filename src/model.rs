//! Records passed between the pipeline stages.

use crate::common::text::clean_text;
use serde::{Deserialize, Serialize};

/// One slide of the outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Bullets as `"- "` prefixed lines joined by `\n`.
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl SlideRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Join bullets into `"- a\n- b"`.
    ///
    /// ```
    /// use slidesmith::model::SlideRecord;
    /// let slide = SlideRecord::from_bullets("Intro", &["a", "b"]);
    /// assert_eq!(slide.content, "- a\n- b");
    /// ```
    pub fn from_bullets<S: AsRef<str>>(title: impl Into<String>, bullets: &[S]) -> Self {
        let content = bullets
            .iter()
            .map(|b| format!("- {}", b.as_ref()))
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(title, content)
    }

    pub fn with_subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = non_blank(subtitle);
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = non_blank(notes);
        self
    }

    /// Content lines with surrounding whitespace and a leading `-` removed.
    /// Blank lines are skipped.
    pub fn bullets(&self) -> Vec<&str> {
        self.content
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                let line = line.strip_prefix('-').map_or(line, str::trim_start);
                (!line.is_empty()).then_some(line)
            })
            .collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// One organic web search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl SearchResult {
    /// `"{title}: {snippet}"` on a single line.
    pub fn context_line(&self) -> String {
        format!("{}: {}", clean_text(&self.title), clean_text(&self.snippet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bullets_strip_markers() {
        let slide = SlideRecord::new("t", "- one\n\n  -two  \nthree\n-\n");
        assert_eq!(slide.bullets(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_blank_notes_are_none() {
        let slide = SlideRecord::new("t", "")
            .with_notes(Some("   ".to_string()))
            .with_subtitle(Some("sub".to_string()));
        assert_eq!(slide.notes, None);
        assert_eq!(slide.subtitle.as_deref(), Some("sub"));
    }

    #[test]
    fn test_context_line() {
        let hit = SearchResult {
            title: "Rust\n2024".to_string(),
            snippet: "  memory   safety ".to_string(),
            link: "https://example.com".to_string(),
        };
        assert_eq!(hit.context_line(), "Rust 2024: memory safety");
    }

    #[test]
    fn test_serde_skips_empty_optionals() {
        let json = serde_json::to_string(&SlideRecord::new("T", "- a")).unwrap();
        assert_eq!(json, r#"{"title":"T","content":"- a"}"#);
        let back: SlideRecord = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(back.content, "");
    }

    proptest! {
        #[test]
        fn prop_bullets_round_trip(bullets in proptest::collection::vec("[A-Za-z0-9][A-Za-z0-9 ,.]{0,20}[A-Za-z0-9]", 0..8)) {
            let slide = SlideRecord::from_bullets("t", &bullets);
            let back: Vec<String> = slide.bullets().into_iter().map(str::to_string).collect();
            prop_assert_eq!(back, bullets);
        }
    }
}
