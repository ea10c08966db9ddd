//! Exa.ai neural search provider implementation.
//!
//! Uses the Exa search API in neural mode, restricted to the academic
//! domain allow-list. API documentation: <https://docs.exa.ai>
//!
//! Exa requires an API key, passed via the `x-api-key` header.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{SearchQuery, SearchResult, SearchResultBuilder, SourceKind};
use crate::sources::{Provider, ProviderCapabilities, SourceError, ACADEMIC_DOMAINS};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const EXA_API_BASE: &str = "https://api.exa.ai";

/// Exa.ai neural search provider
///
/// Exa returns author and publication date but no volume/pages metadata;
/// those stay empty and are back-filled by directory providers in the
/// merge when available.
#[derive(Debug, Clone)]
pub struct ExaProvider {
    client: Arc<HttpClient>,
    api_key: String,
    base_url: String,
}

impl ExaProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, EXA_API_BASE.to_string())
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
impl Provider for ExaProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::Exa
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::SEARCH | ProviderCapabilities::DOMAIN_FILTER
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SourceError> {
        let url = format!("{}/search", self.base_url);
        let body = ExaRequest {
            query: query.query.clone(),
            num_results: query.max_results.min(20),
            search_type: "neural".to_string(),
            include_domains: ACADEMIC_DOMAINS.iter().map(|d| d.to_string()).collect(),
        };

        let client = Arc::clone(&self.client);
        let api_key = self.api_key.clone();

        let response = with_retry(api_retry_config(), || {
            let client = Arc::clone(&client);
            let url = url.clone();
            let body = body.clone();
            let api_key = api_key.clone();
            async move {
                let response = client
                    .post(&url)
                    .header("x-api-key", api_key)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to search Exa: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(SourceError::Api(format!(
                        "Exa API returned status {}: {}",
                        status, text
                    )));
                }

                let json: ExaResponse = response.json().await.map_err(|e| {
                    SourceError::Parse(format!("Failed to parse Exa response: {}", e))
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
                let year = hit
                    .published_date
                    .as_deref()
                    .map(published_year)
                    .unwrap_or_default();
                let url = hit.url;
                SearchResultBuilder::new(hit.title.unwrap_or_default(), url.clone(), SourceKind::Exa)
                    .snippet(hit.text.unwrap_or_default())
                    .authors(hit.author.unwrap_or_default())
                    .year(year)
                    .main_pub_url(url)
                    .build()
            })
            .collect())
    }
}

/// Year part of an Exa published date ("2017-01-15"); falls back to the
/// leading segment when the date is not a full calendar date.
fn published_year(date: &str) -> String {
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return parsed.format("%Y").to_string();
    }
    date.split('-').next().unwrap_or_default().to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaRequest {
    query: String,
    num_results: usize,
    #[serde(rename = "type")]
    search_type: String,
    include_domains: Vec<String>,
}

/// Exa API response
#[derive(Debug, Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Vec<ExaHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaHit {
    title: Option<String>,
    #[serde(default)]
    url: String,
    text: Option<String>,
    author: Option<String>,
    published_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_year() {
        assert_eq!(published_year("2017-01-15"), "2017");
        assert_eq!(published_year("2017"), "2017");
        assert_eq!(published_year(""), "");
    }

    #[tokio::test]
    async fn test_search_parses_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_header("x-api-key", "exa-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results": [{
                    "title": "Neural networks survey",
                    "url": "https://arxiv.org/abs/1234.5678",
                    "text": "A long survey of neural networks.",
                    "author": "Jane Doe",
                    "publishedDate": "2021-06-01"
                }]}"#,
            )
            .create_async()
            .await;

        let provider = ExaProvider::with_base_url("exa-key".to_string(), server.url());
        let results = provider
            .search(&SearchQuery::new("neural networks"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].year, "2021");
        assert_eq!(results[0].authors, "Jane Doe");
        assert_eq!(
            results[0].main_pub_url.as_deref(),
            Some("https://arxiv.org/abs/1234.5678")
        );
    }

    #[tokio::test]
    async fn test_search_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/search")
            .with_status(400)
            .with_body("bad request")
            .create_async()
            .await;

        let provider = ExaProvider::with_base_url("exa-key".to_string(), server.url());
        let err = provider.search(&SearchQuery::new("q")).await.unwrap_err();
        assert!(matches!(err, SourceError::Api(_)));
    }
}
