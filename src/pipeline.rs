//! Topic to deck: search query, web search, synthesis, rendering.

use crate::cache::CacheStore;
use crate::common::text::pretty_json;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::generator::{Generator, RenderReport};
use crate::images::{ImageClient, ImageSource};
use crate::llm::{LlmClient, TextGenerator};
use crate::prompts::{PromptFile, SEARCH_QUERY_GENERATION_PROMPT};
use crate::search::{SearchClient, WebSearch};
use crate::synthesizer::synthesize;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

/// What to build and where.
#[derive(Debug, Clone)]
pub struct Request {
    pub topic: String,
    pub template: PathBuf,
    pub output: PathBuf,
    /// Also write the synthesized outline as JSON.
    pub outline_out: Option<PathBuf>,
}

/// The collaborators one run talks to.
pub struct Pipeline<'a> {
    pub llm: &'a dyn TextGenerator,
    pub search: &'a dyn WebSearch,
    pub images: &'a dyn ImageSource,
    pub prompts: &'a PromptFile,
    pub max_search_results: usize,
}

impl Pipeline<'_> {
    pub fn run(&self, request: &Request) -> Result<RenderReport> {
        if !request.template.is_file() {
            return Err(Error::TemplateNotFound(request.template.clone()));
        }
        let topic = request.topic.trim();

        info!("Generating search query");
        let query_prompt = self
            .prompts
            .render_section(SEARCH_QUERY_GENERATION_PROMPT, &[("topic", topic)])?;
        let mut query = self.llm.generate(&query_prompt)?.trim().to_string();
        if query.is_empty() {
            warn!("Empty search query from the model, searching for the topic");
            query = topic.to_string();
        }
        info!("Search query: {}", query);

        info!("Searching the web");
        let context: Vec<String> = self
            .search
            .search(&query, self.max_search_results)
            .iter()
            .map(|hit| hit.context_line())
            .collect();

        info!("Synthesizing slides");
        let slides = synthesize(topic, &context, self.llm, self.prompts)?;

        if let Some(path) = &request.outline_out {
            fs::write(path, pretty_json(&slides)?)?;
            info!("Outline written to {}", path.display());
        }

        info!("Generating deck");
        Generator::new(self.images).render(&slides, &request.template, &request.output)
    }
}

/// Flags that override the environment configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub prompt_file: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.prompt_file {
            config.prompt_file = path.clone();
        }
        if let Some(dir) = &self.images_dir {
            config.images_dir = dir.clone();
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
    }
}

/// Run with the real HTTP clients built from `config`.
///
/// The template and prompt file are checked before any network call.
pub fn run(config: &Config, request: &Request, use_cache: bool) -> Result<RenderReport> {
    if !request.template.is_file() {
        return Err(Error::TemplateNotFound(request.template.clone()));
    }
    let prompts = PromptFile::open(&config.prompt_file)?;

    let llm = LlmClient::new(config)?;
    let mut search = SearchClient::new(config)?;
    if use_cache {
        search = search.with_cache(CacheStore::new(&config.cache_dir));
    }
    let images = ImageClient::new(config)?;

    Pipeline {
        llm: &llm,
        search: &search,
        images: &images,
        prompts: &prompts,
        max_search_results: config.max_search_results,
    }
    .run(request)
}
