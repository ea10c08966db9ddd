//! Tavily web search provider implementation.
//!
//! Uses the Tavily search API for generic web results, restricted to the
//! academic domain allow-list. API documentation: <https://docs.tavily.com>
//!
//! Tavily requires an API key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{SearchQuery, SearchResult, SearchResultBuilder, SourceKind};
use crate::sources::{
    Provider, ProviderCapabilities, SourceError, ACADEMIC_DOMAINS,
};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const TAVILY_API_BASE: &str = "https://api.tavily.com";

/// Tavily web search provider
///
/// Results come back without bibliographic metadata; they carry only
/// title/url/snippet and rely on higher-precedence providers to back-fill
/// authors, year and journal fields during the merge.
#[derive(Debug, Clone)]
pub struct TavilyProvider {
    client: Arc<HttpClient>,
    api_key: String,
    base_url: String,
}

impl TavilyProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, TAVILY_API_BASE.to_string())
    }

    /// Point the provider at a different endpoint (used by tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Arc::new(HttpClient::new()),
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl Provider for TavilyProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::Tavily
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::SEARCH | ProviderCapabilities::DOMAIN_FILTER
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SourceError> {
        let url = format!("{}/search", self.base_url);
        let body = TavilyRequest {
            api_key: self.api_key.clone(),
            query: query.query.clone(),
            search_depth: "basic".to_string(),
            max_results: query.max_results.min(20),
            include_domains: ACADEMIC_DOMAINS.iter().map(|d| d.to_string()).collect(),
        };

        let client = Arc::clone(&self.client);

        let response = with_retry(api_retry_config(), || {
            let client = Arc::clone(&client);
            let url = url.clone();
            let body = body.clone();
            async move {
                let response = client
                    .post(&url)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to search Tavily: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(SourceError::Api(format!(
                        "Tavily API returned status {}: {}",
                        status, text
                    )));
                }

                let json: TavilyResponse = response.json().await.map_err(|e| {
                    SourceError::Parse(format!("Failed to parse Tavily response: {}", e))
                })?;

                Ok(json)
            }
        })
        .await?;

        Ok(response
            .results
            .into_iter()
            .filter(|hit| !hit.url.trim().is_empty())
            .map(|hit| {
                SearchResultBuilder::new(
                    hit.title.unwrap_or_default(),
                    hit.url,
                    SourceKind::Tavily,
                )
                .snippet(hit.content.unwrap_or_default())
                .build()
            })
            .collect())
    }
}

#[derive(Debug, Clone, Serialize)]
struct TavilyRequest {
    api_key: String,
    query: String,
    search_depth: String,
    max_results: usize,
    include_domains: Vec<String>,
}

/// Tavily API response
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Debug, Deserialize)]
struct TavilyHit {
    title: Option<String>,
    #[serde(default)]
    url: String,
    content: Option<String>,
}
