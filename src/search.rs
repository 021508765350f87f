//! Web search through SerpAPI's Google engine.

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::SearchResult;
use log::{debug, info, warn};
use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;

const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";

/// A web search backend.
pub trait WebSearch {
    /// At most `max_results` hits; failures give an empty list.
    fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult>;
}

pub struct SearchClient {
    client: Client,
    api_key: Option<String>,
    cache: Option<CacheStore>,
}

impl SearchClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            client,
            api_key: config.serpapi_key.clone(),
            cache: None,
        })
    }

    /// Memoise results in `cache`.
    pub fn with_cache(mut self, cache: CacheStore) -> Self {
        self.cache = Some(cache);
        self
    }

    fn fetch(&self, query: &str, api_key: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let url = Url::parse_with_params(
            SERPAPI_ENDPOINT,
            &[("engine", "google"), ("q", query), ("api_key", api_key)],
        )
        .map_err(|e| Error::Config(format!("search URL: {}", e)))?;

        let response = self.client.get(url).send()?.error_for_status()?;
        let body: Value = response.json()?;
        Ok(parse_organic_results(&body, max_results))
    }
}

impl WebSearch for SearchClient {
    /// Organic hits, memoised when a cache is attached. Failures are logged.
    fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("SERPAPI_KEY not set, skipping web search");
            return Vec::new();
        };

        let cache_key = format!("search:{}:{}", max_results, query);
        if let Some(cache) = &self.cache {
            match cache.load_as::<Vec<SearchResult>>(&cache_key) {
                Ok(Some(hits)) => {
                    debug!("Using cached search results for {:?}", query);
                    return hits;
                },
                Ok(None) => {},
                Err(e) => warn!("Ignoring unreadable search cache entry: {}", e),
            }
        }

        let hits = match self.fetch(query, api_key, max_results) {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Web search failed: {}", e);
                return Vec::new();
            },
        };
        info!("Web search returned {} results", hits.len());

        if let Some(cache) = &self.cache
            && let Err(e) = cache.save_as(&cache_key, &hits)
        {
            warn!("Cannot cache search results: {}", e);
        }
        hits
    }
}

/// First `max_results` entries of `organic_results`; absent fields become empty strings.
pub fn parse_organic_results(body: &Value, max_results: usize) -> Vec<SearchResult> {
    let field = |item: &Value, name: &str| item[name].as_str().unwrap_or_default().to_string();

    body["organic_results"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .take(max_results)
                .map(|item| SearchResult {
                    title: field(item, "title"),
                    snippet: field(item, "snippet"),
                    link: field(item, "link"),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn config(serpapi_key: Option<&str>) -> Config {
        let serpapi_key = serpapi_key.map(str::to_string);
        Config::from_env(move |key| match key {
            "GEMINI_API_KEY" => Some("g".to_string()),
            "SERPAPI_KEY" => serpapi_key.clone(),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_parse_truncates_and_defaults() {
        let body = json!({
            "organic_results": [
                {"title": "A", "snippet": "sa", "link": "https://a"},
                {"title": "B"},
                {"title": "C", "snippet": "sc", "link": "https://c"}
            ]
        });
        let hits = parse_organic_results(&body, 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].link, "https://a");
        assert_eq!(hits[1].snippet, "");
        assert_eq!(hits[1].link, "");
    }

    #[test]
    fn test_parse_without_results() {
        assert!(parse_organic_results(&json!({"error": "quota"}), 5).is_empty());
    }

    #[test]
    fn test_no_key_returns_empty() {
        let client = SearchClient::new(&config(None)).unwrap();
        assert!(client.search("rust", 5).is_empty());
    }

    #[test]
    fn test_cached_results_skip_network() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path());
        let cached = vec![SearchResult {
            title: "cached".to_string(),
            snippet: "s".to_string(),
            link: "l".to_string(),
        }];
        cache.save_as("search:3:rust", &cached).unwrap();

        let client = SearchClient::new(&config(Some("key"))).unwrap().with_cache(cache);
        assert_eq!(client.search("rust", 3), cached);
    }
}
