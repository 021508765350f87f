//! Prompt templates stored as named sections of one text file.
//!
//! A section starts with a `NAME:` line and runs to the next line beginning
//! with `---` or the end of the file. Templates use `{name}` placeholders;
//! literal braces are written `{{` and `}}`.

use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SEARCH_QUERY_GENERATION_PROMPT: &str = "SEARCH_QUERY_GENERATION_PROMPT";
pub const SLIDE_GENERATION_PROMPT: &str = "SLIDE_GENERATION_PROMPT";

#[derive(Debug, Clone)]
pub struct PromptFile {
    path: PathBuf,
    content: String,
}

impl PromptFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::Prompt(format!("prompt file not found at {}", path.display())),
            _ => Error::Prompt(format!("cannot read {}: {}", path.display(), e)),
        })?;
        Ok(Self::from_string(path, content))
    }

    pub fn from_string<P: Into<PathBuf>>(path: P, content: String) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Trimmed text of section `name`.
    pub fn section(&self, name: &str) -> Result<String> {
        let pattern = format!(r"(?s){}:\n(.*?)(?:\n---|\z)", regex::escape(name));
        let re = Regex::new(&pattern).map_err(|e| Error::Prompt(e.to_string()))?;
        re.captures(&self.content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .ok_or_else(|| Error::Prompt(format!("section '{}' not found in {}", name, self.path.display())))
    }

    /// Section `name` rendered with `vars`.
    pub fn render_section(&self, name: &str, vars: &[(&str, &str)]) -> Result<String> {
        render(&self.section(name)?, vars)
    }
}

/// Substitute `{key}` placeholders.
///
/// ```
/// use slidesmith::prompts::render;
/// let out = render("Topic: {topic} {{json}}", &[("topic", "Rust")]).unwrap();
/// assert_eq!(out, "Topic: Rust {json}");
/// ```
pub fn render(template: &str, vars: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                chars.next();
                out.push('{');
            },
            '{' => {
                let rest = &template[pos + 1..];
                let end = rest
                    .find('}')
                    .ok_or_else(|| Error::Prompt(format!("unclosed '{{' at byte {}", pos)))?;
                let key = &rest[..end];
                let value = vars
                    .iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| Error::Prompt(format!("unknown placeholder {{{}}}", key)))?;
                out.push_str(value);
                // Skip the key and its closing brace
                for _ in 0..key.chars().count() + 1 {
                    chars.next();
                }
            },
            '}' if chars.peek().map(|&(_, n)| n) == Some('}') => {
                chars.next();
                out.push('}');
            },
            '}' => return Err(Error::Prompt(format!("single '}}' at byte {}", pos))),
            _ => out.push(c),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "SEARCH_QUERY_GENERATION_PROMPT:\nQuery for {topic}.\n\n---\n\nSLIDE_GENERATION_PROMPT:\nSlides on {topic}\n{context}\nReturn {{\"slides\": []}}\n";

    fn prompts() -> PromptFile {
        PromptFile::from_string("prompts.md", FILE.to_string())
    }

    #[test]
    fn test_section_stops_at_separator() {
        assert_eq!(
            prompts().section(SEARCH_QUERY_GENERATION_PROMPT).unwrap(),
            "Query for {topic}."
        );
    }

    #[test]
    fn test_last_section_runs_to_end() {
        let section = prompts().section(SLIDE_GENERATION_PROMPT).unwrap();
        assert!(section.starts_with("Slides on"));
        assert!(section.ends_with("[]}}"));
    }

    #[test]
    fn test_missing_section() {
        assert!(matches!(prompts().section("NOPE"), Err(Error::Prompt(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = PromptFile::open("/definitely/not/here/prompts.md").unwrap_err();
        assert!(matches!(err, Error::Prompt(msg) if msg.contains("not found")));
    }

    #[test]
    fn test_render_section() {
        let out = prompts()
            .render_section(SLIDE_GENERATION_PROMPT, &[("topic", "Tea"), ("context", "a: b")])
            .unwrap();
        assert_eq!(out, "Slides on Tea\na: b\nReturn {\"slides\": []}");
    }

    #[test]
    fn test_render_errors() {
        assert!(render("{missing}", &[]).is_err());
        assert!(render("open {topic", &[("topic", "x")]).is_err());
        assert!(render("stray }", &[]).is_err());
    }

    #[test]
    fn test_render_multibyte_values_and_keys() {
        assert_eq!(render("→{t}←", &[("t", "ü")]).unwrap(), "→ü←");
    }
}
