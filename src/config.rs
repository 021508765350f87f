//! Runtime configuration read from the environment.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 5;

/// Settings for one run, built once and passed down.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub serpapi_key: Option<String>,
    pub pexels_api_key: Option<String>,
    /// Model name without the `models/` prefix.
    pub model: String,
    pub llm_base_url: String,
    pub cache_dir: PathBuf,
    pub images_dir: PathBuf,
    pub prompt_file: PathBuf,
    pub max_search_results: usize,
    pub http_timeout: Duration,
    pub llm_timeout: Duration,
}

impl Config {
    /// Read the process environment.
    pub fn from_process_env() -> Result<Self> {
        Self::from_env(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; blank values count as unset.
    pub fn from_env<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let gemini_api_key = get("GEMINI_API_KEY").ok_or(Error::MissingCredential("GEMINI_API_KEY"))?;

        let max_search_results = match get("MAX_SEARCH_RESULTS") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| Error::Config(format!("MAX_SEARCH_RESULTS must be a non-negative integer, got {:?}", raw)))?,
            None => DEFAULT_MAX_SEARCH_RESULTS,
        };

        let model = get("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let model = model.strip_prefix("models/").map(str::to_string).unwrap_or(model);

        Ok(Self {
            gemini_api_key,
            serpapi_key: get("SERPAPI_KEY"),
            pexels_api_key: get("PEXELS_API_KEY"),
            model,
            llm_base_url: get("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            cache_dir: get("CACHE_DIR").map_or_else(|| PathBuf::from(".cache"), PathBuf::from),
            images_dir: get("IMAGES_DIR").map_or_else(|| PathBuf::from("images"), PathBuf::from),
            prompt_file: get("PROMPT_FILE").map_or_else(|| PathBuf::from("prompts.md"), PathBuf::from),
            max_search_results,
            http_timeout: Duration::from_secs(10),
            llm_timeout: Duration::from_secs(60),
        })
    }
}
