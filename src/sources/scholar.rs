//! Google Scholar provider implementation, via the SerpApi proxy.
//!
//! Google Scholar has no official API; SerpApi exposes its organic results
//! as JSON. Bibliographic metadata arrives as a single free-text
//! `publication_info.summary` string, so this adapter leans on the
//! extraction heuristics in [`crate::utils::extract`] for year, volume,
//! pages and journal name, and on a DOI pattern applied to snippet and
//! link.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{SearchQuery, SearchResult, SearchResultBuilder, SourceKind};
use crate::sources::{Provider, ProviderCapabilities, SourceError};
use crate::utils::extract::extract_fields;
use crate::utils::{api_retry_config, with_retry, HttpClient};

const SERPAPI_BASE: &str = "https://serpapi.com";

/// Google Scholar provider (SerpApi-backed)
#[derive(Debug, Clone)]
pub struct ScholarProvider {
    client: Arc<HttpClient>,
    api_key: String,
    base_url: String,
}

impl ScholarProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, SERPAPI_BASE.to_string())
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
impl Provider for ScholarProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::GoogleScholar
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::SEARCH
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SourceError> {
        let url = format!(
            "{}/search.json?engine=google_scholar&q={}&num={}&api_key={}",
            self.base_url,
            urlencoding::encode(&query.query),
            query.max_results.min(20),
            urlencoding::encode(&self.api_key)
        );

        let client = Arc::clone(&self.client);
        let url_for_retry = url.clone();

        let response = with_retry(api_retry_config(), || {
            let client = Arc::clone(&client);
            let url = url_for_retry.clone();
            async move {
                let response = client.get(&url).send().await.map_err(|e| {
                    SourceError::Network(format!("Failed to search Google Scholar: {}", e))
                })?;

                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(SourceError::Api(format!(
                        "SerpApi returned status {}: {}",
                        status, text
                    )));
                }

                let json: SerpApiResponse = response.json().await.map_err(|e| {
                    SourceError::Parse(format!("Failed to parse SerpApi response: {}", e))
                })?;

                Ok(json)
            }
        })
        .await?;

        // SerpApi reports its own failures in-band
        if let Some(error) = response.error {
            return Err(SourceError::Api(error));
        }
        if let Some(metadata) = &response.search_metadata {
            if let Some(status) = &metadata.status {
                if status != "Success" {
                    let detail = metadata.error.clone().unwrap_or_else(|| status.clone());
                    return Err(SourceError::Api(format!(
                        "Scholar search not successful: {}",
                        detail
                    )));
                }
            }
        }

        Ok(response
            .organic_results
            .into_iter()
            .filter_map(|hit| parse_organic_result(hit))
            .collect())
    }
}

fn parse_organic_result(hit: OrganicResult) -> Option<SearchResult> {
    let pdf_link = hit.resources.iter().find_map(|resource| {
        if resource.file_format.as_deref() == Some("PDF") {
            resource.link.clone()
        } else {
            None
        }
    });

    let url = hit.link.clone().or_else(|| pdf_link.clone())?;

    let snippet = hit.snippet.unwrap_or_default();
    let doi = extract_doi(&snippet)
        .or_else(|| hit.link.as_deref().and_then(extract_doi))
        .unwrap_or_default();

    let summary = hit
        .publication_info
        .and_then(|info| info.summary)
        .unwrap_or_default();
    let authors = extract_summary_authors(&summary);
    let fields = extract_fields(&summary, &authors);

    Some(
        SearchResultBuilder::new(
            hit.title.unwrap_or_default(),
            url,
            SourceKind::GoogleScholar,
        )
        .snippet(snippet)
        .authors(authors)
        .year(fields.year)
        .volume(fields.volume)
        .pages(fields.pages)
        .journal_name(fields.journal_name)
        .doi(doi)
        .pdf_url(pdf_link.unwrap_or_default())
        .main_pub_url(hit.link.unwrap_or_default())
        .build(),
    )
}

/// DOIs embedded in snippets or links: `10.<registrant>/<suffix>`.
fn extract_doi(text: &str) -> Option<String> {
    let re = Regex::new(r"(10\.\d{4,}/[^\s]+)").ok()?;
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Authors are the summary text before the first " - " separator or the
/// first 4-digit year, whichever comes first.
fn extract_summary_authors(summary: &str) -> String {
    let Ok(re) = Regex::new(r"^(.*?)(?: - |\b\d{4}\b|$)") else {
        return String::new();
    };
    re.captures(summary)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().trim_end_matches(',').to_string())
        .unwrap_or_default()
}

/// SerpApi Google Scholar response
#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    search_metadata: Option<SearchMetadata>,
    error: Option<String>,
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct SearchMetadata {
    status: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    publication_info: Option<PublicationInfo>,
    #[serde(default)]
    resources: Vec<ScholarResource>,
}

#[derive(Debug, Deserialize)]
struct PublicationInfo {
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScholarResource {
    file_format: Option<String>,
    link: Option<String>,
}
