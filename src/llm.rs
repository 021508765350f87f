//! Gemini `generateContent` client.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::SlideRecord;
use log::debug;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Produces text for a prompt.
pub trait TextGenerator {
    /// Model reply, trimmed; empty when the model returned no text.
    fn generate(&self, prompt: &str) -> Result<String>;
}

pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.llm_timeout).build()?;
        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.model.clone(),
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> Result<Url> {
        let base = format!("{}/models/{}:generateContent", self.base_url, self.model);
        Url::parse_with_params(&base, &[("key", self.api_key.as_str())])
            .map_err(|e| Error::Config(format!("LLM endpoint {}: {}", base, e)))
    }

    /// Ask for a slide outline and parse it with [`parse_outline`].
    pub fn synthesize_outline(&self, topic: &str, web_results: &[String]) -> Result<Vec<SlideRecord>> {
        let raw = self.generate(&outline_prompt(topic, web_results))?;
        Ok(parse_outline(&raw))
    }
}

impl TextGenerator for LlmClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Calling {} with a {} byte prompt", self.model, prompt.len());
        let response = self.client.post(self.endpoint()?).json(&request).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Llm(format!("{}: {}", status, error_message(&body))));
        }

        let parsed: GenerateContentResponse = response.json()?;
        Ok(reply_text(parsed))
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Text parts of the first candidate, concatenated and trimmed.
fn reply_text(response: GenerateContentResponse) -> String {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();
    text.trim().to_string()
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let message = wrapper.error.message?;
            Some(match wrapper.error.status {
                Some(status) if !status.is_empty() => format!("{}: {}", status, message),
                _ => message,
            })
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn outline_prompt(topic: &str, web_results: &[String]) -> String {
    format!(
        concat!(
            "Create a structured slide outline for a PowerPoint presentation on: {}.\n",
            "Use around 7-8 slides maximum.\n",
            "Each slide should have:\n",
            "- title\n",
            "- 3-4 short bullet points\n",
            "Keep text concise for presentation.\n",
            "Web results for reference:\n{}\n"
        ),
        topic,
        web_results.join("\n")
    )
}

/// Markdown-ish outline to slides: `#` lines open a slide, `-` lines add bullets.
///
/// Other lines are ignored and slides without a title are dropped.
pub fn parse_outline(text: &str) -> Vec<SlideRecord> {
    let mut slides = Vec::new();
    let mut title = String::new();
    let mut bullets: Vec<String> = Vec::new();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(heading) = line.strip_prefix('#') {
            if !title.is_empty() {
                slides.push(SlideRecord::from_bullets(std::mem::take(&mut title), &bullets));
            }
            title = heading.trim_start_matches('#').trim().to_string();
            bullets.clear();
        } else if let Some(bullet) = line.strip_prefix('-') {
            bullets.push(bullet.trim_start_matches('-').trim().to_string());
        }
    }
    if !title.is_empty() {
        slides.push(SlideRecord::from_bullets(title, &bullets));
    }
    slides
}
