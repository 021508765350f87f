//! Turn search context into slide records through the language model.

use crate::error::Result;
use crate::llm::TextGenerator;
use crate::model::SlideRecord;
use crate::prompts::{PromptFile, SLIDE_GENERATION_PROMPT};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// First ```json block, up to the nearest closing fence
static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json[^\n]*\n(.*?)```").expect("Failed to build JSON fence pattern"));

/// Slides for `topic`, never empty.
///
/// Errors only when the prompt cannot be built or the model call fails; an
/// unusable reply becomes a single summary slide.
pub fn synthesize(
    topic: &str,
    context: &[String],
    llm: &dyn TextGenerator,
    prompts: &PromptFile,
) -> Result<Vec<SlideRecord>> {
    let joined = context.join("\n");
    let prompt = prompts.render_section(SLIDE_GENERATION_PROMPT, &[("topic", topic), ("context", &joined)])?;
    let reply = llm.generate(&prompt)?;
    let slides = parse_slides(topic, reply.trim());
    info!("Synthesized {} slides", slides.len());
    Ok(slides)
}

/// Slides from the first ```` ```json ```` block of `reply`, or the summary fallback.
pub fn parse_slides(topic: &str, reply: &str) -> Vec<SlideRecord> {
    match extract_slides(reply) {
        Ok(slides) if !slides.is_empty() => slides,
        Ok(_) => {
            warn!("No slides in the model reply, falling back to a summary slide");
            vec![fallback(topic, reply)]
        },
        Err(reason) => {
            warn!("{}, falling back to a summary slide", reason);
            vec![fallback(topic, reply)]
        },
    }
}

fn fallback(topic: &str, reply: &str) -> SlideRecord {
    SlideRecord::new(format!("Summary: {}", topic), reply)
}

fn extract_slides(reply: &str) -> std::result::Result<Vec<SlideRecord>, String> {
    let block = JSON_FENCE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| "No JSON block in the model reply".to_string())?;

    let value: Value = serde_json::from_str(block).map_err(|e| format!("Invalid JSON in the model reply: {}", e))?;
    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("slides") {
            Some(Value::Array(items)) => items,
            _ => return Err("Model reply has no \"slides\" list".to_string()),
        },
        _ => return Err("Model reply JSON is neither an object nor a list".to_string()),
    };

    Ok(items.iter().filter(|item| item.is_object()).map(slide_from_json).collect())
}

fn slide_from_json(item: &Value) -> SlideRecord {
    let text = |name: &str| match &item[name] {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let strings = |name: &str| -> Vec<String> {
        item[name]
            .as_array()
            .map(|values| {
                values
                    .iter()
                    .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut slide = SlideRecord::from_bullets(text("title"), &strings("bullets"))
        .with_subtitle(Some(text("subtitle")))
        .with_notes(Some(text("notes")));
    slide.sources = strings("sources");
    slide
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;
    use std::cell::RefCell;

    struct Canned {
        reply: String,
        prompts: RefCell<Vec<String>>,
    }

    impl Canned {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for Canned {
        fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct Failing;

    impl TextGenerator for Failing {
        fn generate(&self, _prompt: &str) -> Result<String> {
            Err(Error::Llm("503: unavailable".to_string()))
        }
    }

    fn prompts() -> PromptFile {
        PromptFile::from_string(
            "prompts.md",
            "SLIDE_GENERATION_PROMPT:\nTopic={topic}\n{context}\n".to_string(),
        )
    }

    #[test]
    fn test_structured_reply() {
        let reply = concat!(
            "Here you go:\n```json\n",
            r#"{"slides": [{"title": "Intro", "subtitle": "", "bullets": ["a", "b"], "notes": "say hi", "sources": ["https://x"]},"#,
            r#" {"title": "Next", "bullets": [1, "two"]}]}"#,
            "\n```\nAnything else?"
        );
        let llm = Canned::new(reply);
        let slides = synthesize("Tea", &["A: one".to_string(), "B: two".to_string()], &llm, &prompts()).unwrap();

        assert_eq!(llm.prompts.borrow()[0], "Topic=Tea\nA: one\nB: two");
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "Intro");
        assert_eq!(slides[0].content, "- a\n- b");
        assert_eq!(slides[0].subtitle, None);
        assert_eq!(slides[0].notes.as_deref(), Some("say hi"));
        assert_eq!(slides[0].sources, vec!["https://x"]);
        assert_eq!(slides[1].content, "- 1\n- two");
        assert_eq!(slides[1].notes, None);
    }

    #[test]
    fn test_bare_array_is_accepted() {
        let slides = parse_slides("T", "```json\n[{\"title\": \"Only\"}]\n```");
        assert_eq!(slides, vec![SlideRecord::new("Only", "")]);
    }

    #[test]
    fn test_first_block_wins() {
        let reply = "```json\n{\"slides\":[{\"title\":\"A\"}]}\n```\n```json\n{\"slides\":[{\"title\":\"B\"}]}\n```";
        let slides = parse_slides("T", reply);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "A");
    }

    #[test]
    fn test_fallbacks() {
        for reply in [
            "no fence at all",
            "```json\n{not json}\n```",
            "```json\n{\"slides\": []}\n```",
            "```json\n{\"pages\": [{\"title\": \"x\"}]}\n```",
            "```json\n42\n```",
        ] {
            let slides = parse_slides("Tea", reply);
            assert_eq!(slides, vec![SlideRecord::new("Summary: Tea", reply)], "reply: {reply}");
        }
    }

    #[test]
    fn test_reply_is_trimmed_before_fallback() {
        let slides = synthesize("Tea", &[], &Canned::new("  plain text \n"), &prompts()).unwrap();
        assert_eq!(slides[0].content, "plain text");
    }

    #[test]
    fn test_model_failure_propagates() {
        assert!(matches!(synthesize("T", &[], &Failing, &prompts()), Err(Error::Llm(_))));
    }

    #[test]
    fn test_missing_section_is_fatal() {
        let empty = PromptFile::from_string("prompts.md", String::new());
        assert!(matches!(synthesize("T", &[], &Canned::new(""), &empty), Err(Error::Prompt(_))));
    }

    proptest! {
        #[test]
        fn prop_never_empty(topic in ".{0,20}", reply in ".{0,200}") {
            prop_assert!(!parse_slides(&topic, &reply).is_empty());
        }

        #[test]
        fn prop_never_empty_with_fence(body in "[\\[\\]{}\",:a-z0-9 ]{0,60}") {
            let reply = format!("```json\n{}\n```", body);
            prop_assert!(!parse_slides("t", &reply).is_empty());
        }
    }
}
