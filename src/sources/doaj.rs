//! DOAJ (Directory of Open Access Journals) provider implementations.
//!
//! Uses the DOAJ API v2 for searching open access articles and journals.
//! API documentation: <https://doaj.org/api/v2>
//!
//! DOAJ is free and requires no API key. It is the only source here that
//! returns fully structured bibliographic fields, so its two providers sit
//! at the top of the default merge precedence.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{SearchQuery, SearchResult, SearchResultBuilder, SourceKind};
use crate::sources::{Provider, ProviderCapabilities, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient};

const DOAJ_API_BASE: &str = "https://doaj.org/api/v2";

/// DOAJ article search provider
#[derive(Debug, Clone)]
pub struct DoajArticlesProvider {
    client: Arc<HttpClient>,
    base_url: String,
}

impl DoajArticlesProvider {
    pub fn new() -> Self {
        Self::with_base_url(DOAJ_API_BASE.to_string())
    }

    /// Point the provider at a different endpoint (used by tests).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Arc::new(HttpClient::new()),
            base_url,
        }
    }
}

impl Default for DoajArticlesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for DoajArticlesProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::DoajArticles
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::SEARCH | ProviderCapabilities::STRUCTURED_METADATA
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SourceError> {
        let response = fetch_doaj(
            &self.client,
            &self.base_url,
            "articles",
            &query.query,
            query.max_results,
        )
        .await?;

        Ok(response
            .results
            .into_iter()
            .filter_map(|entry| parse_article(entry.bibjson))
            .collect())
    }
}

/// DOAJ journal search provider
///
/// Journal entries have no authors, year or pages; they carry the journal
/// title, publisher and ISSN instead.
#[derive(Debug, Clone)]
pub struct DoajJournalsProvider {
    client: Arc<HttpClient>,
    base_url: String,
}

impl DoajJournalsProvider {
    pub fn new() -> Self {
        Self::with_base_url(DOAJ_API_BASE.to_string())
    }

    /// Point the provider at a different endpoint (used by tests).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Arc::new(HttpClient::new()),
            base_url,
        }
    }
}

impl Default for DoajJournalsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for DoajJournalsProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::DoajJournals
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::SEARCH | ProviderCapabilities::STRUCTURED_METADATA
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SourceError> {
        let response = fetch_doaj(
            &self.client,
            &self.base_url,
            "journals",
            &query.query,
            query.max_results,
        )
        .await?;

        Ok(response
            .results
            .into_iter()
            .filter_map(|entry| parse_journal(entry.bibjson))
            .collect())
    }
}

/// Shared GET against `/search/{endpoint}/{query}` with retry.
async fn fetch_doaj(
    client: &Arc<HttpClient>,
    base_url: &str,
    endpoint: &str,
    query: &str,
    max_results: usize,
) -> Result<DoajResponse, SourceError> {
    let url = format!(
        "{}/search/{}/{}?page=1&pageSize={}",
        base_url,
        endpoint,
        urlencoding::encode(query),
        max_results.min(100)
    );

    let client = Arc::clone(client);
    let url_for_retry = url.clone();

    with_retry(api_retry_config(), || {
        let client = Arc::clone(&client);
        let url = url_for_retry.clone();
        async move {
            let response = client
                .get(&url)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| SourceError::Network(format!("Failed to search DOAJ: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(SourceError::Api(format!(
                    "DOAJ API returned status {}: {}",
                    status, text
                )));
            }

            let json: DoajResponse = response.json().await.map_err(|e| {
                SourceError::Parse(format!("Failed to parse DOAJ response: {}", e))
            })?;

            Ok(json)
        }
    })
    .await
}

fn parse_article(bibjson: DoajBibjson) -> Option<SearchResult> {
    // Prefer a fulltext link as the record URL, collect a PDF link separately
    let mut url = None;
    let mut pdf_url = None;
    for link in &bibjson.link {
        match (link.link_type.as_deref(), &link.url) {
            (Some("fulltext"), Some(u)) if url.is_none() => url = Some(u.clone()),
            (Some("pdf"), Some(u)) if pdf_url.is_none() => pdf_url = Some(u.clone()),
            _ => {}
        }
    }
    let url = url.or_else(|| bibjson.link.iter().find_map(|l| l.url.clone()))?;

    let authors: String = bibjson
        .author
        .iter()
        .filter_map(|a| a.name.clone())
        .collect::<Vec<_>>()
        .join(", ");

    let pages = match (&bibjson.start_page, &bibjson.end_page) {
        (Some(start), Some(end)) => format!("{}-{}", start, end),
        (Some(start), None) => start.clone(),
        (None, Some(end)) => end.clone(),
        (None, None) => String::new(),
    };

    let doi = bibjson
        .identifier
        .iter()
        .find(|i| i.id_type.as_deref() == Some("doi"))
        .and_then(|i| i.id.clone())
        .unwrap_or_default();

    let journal = bibjson.journal.unwrap_or_default();

    Some(
        SearchResultBuilder::new(
            bibjson.title.unwrap_or_default(),
            url.clone(),
            SourceKind::DoajArticles,
        )
        .snippet(bibjson.abstract_text.unwrap_or_default())
        .authors(authors)
        .year(bibjson.year.unwrap_or_default())
        .pdf_url(pdf_url.unwrap_or_default())
        .main_pub_url(url)
        .doi(doi)
        .journal_name(journal.title.unwrap_or_default())
        .volume(journal.volume.unwrap_or_default())
        .pages(pages)
        .build(),
    )
}

fn parse_journal(bibjson: DoajBibjson) -> Option<SearchResult> {
    // Journal homepage first, otherwise any link with a URL
    let url = bibjson
        .link
        .iter()
        .find(|l| l.link_type.as_deref() == Some("homepage"))
        .and_then(|l| l.url.clone())
        .or_else(|| bibjson.link.iter().find_map(|l| l.url.clone()))?;

    let issn: String = bibjson
        .identifier
        .iter()
        .filter(|i| matches!(i.id_type.as_deref(), Some("pissn") | Some("eissn")))
        .filter_map(|i| i.id.clone())
        .collect::<Vec<_>>()
        .join(", ");

    let snippet = if bibjson.keywords.is_empty() {
        String::new()
    } else {
        format!("Keywords: {}", bibjson.keywords.join(", "))
    };

    let title = bibjson.title.unwrap_or_default();

    Some(
        SearchResultBuilder::new(title.clone(), url.clone(), SourceKind::DoajJournals)
            .snippet(snippet)
            .main_pub_url(url)
            .journal_name(title)
            .publisher(bibjson.publisher.unwrap_or_default())
            .issn(issn)
            .build(),
    )
}

/// DOAJ API response
#[derive(Debug, Deserialize)]
struct DoajResponse {
    #[serde(default)]
    results: Vec<DoajEntry>,
}

#[derive(Debug, Deserialize)]
struct DoajEntry {
    #[serde(default)]
    bibjson: DoajBibjson,
}

#[derive(Debug, Default, Deserialize)]
struct DoajBibjson {
    title: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    year: Option<String>,
    publisher: Option<String>,
    #[serde(default)]
    author: Vec<DoajAuthor>,
    #[serde(default)]
    link: Vec<DoajLink>,
    #[serde(default)]
    identifier: Vec<DoajIdentifier>,
    journal: Option<DoajJournal>,
    start_page: Option<String>,
    end_page: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DoajAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DoajLink {
    #[serde(rename = "type")]
    link_type: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DoajIdentifier {
    #[serde(rename = "type")]
    id_type: Option<String>,
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DoajJournal {
    title: Option<String>,
    volume: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_BODY: &str = r#"{"results": [{
        "bibjson": {
            "title": "Open access metabolomics",
            "abstract": "A study of metabolomic methods.",
            "year": "2019",
            "author": [{"name": "Jane Doe"}, {"name": "John Smith"}],
            "link": [
                {"type": "fulltext", "url": "https://journal.example/article/9"},
                {"type": "pdf", "url": "https://journal.example/article/9.pdf"}
            ],
            "identifier": [{"type": "doi", "id": "10.5555/oam.9"}],
            "journal": {"title": "Journal of Open Metabolomics", "volume": "12"},
            "start_page": "101",
            "end_page": "110"
        }
    }]}"#;

    #[tokio::test]
    async fn test_article_search_maps_structured_fields() {
        let mut server = mockito::Server::new_async().await;
        let path = mockito::Matcher::Regex(r"^/search/articles/.*".to_string());
        let _m = server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ARTICLE_BODY)
            .create_async()
            .await;

        let provider = DoajArticlesProvider::with_base_url(server.url());
        let results = provider
            .search(&SearchQuery::new("metabolomics"))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        let hit = &results[0];
        assert_eq!(hit.url, "https://journal.example/article/9");
        assert_eq!(
            hit.pdf_url.as_deref(),
            Some("https://journal.example/article/9.pdf")
        );
        assert_eq!(hit.authors, "Jane Doe, John Smith");
        assert_eq!(hit.pages.as_deref(), Some("101-110"));
        assert_eq!(hit.doi.as_deref(), Some("10.5555/oam.9"));
        assert_eq!(
            hit.journal_name.as_deref(),
            Some("Journal of Open Metabolomics")
        );
        assert_eq!(hit.volume.as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn test_journal_search_maps_publisher_and_issn() {
        let mut server = mockito::Server::new_async().await;
        let path = mockito::Matcher::Regex(r"^/search/journals/.*".to_string());
        let _m = server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results": [{
                    "bibjson": {
                        "title": "Annals of Examples",
                        "publisher": "Example Press",
                        "link": [{"type": "homepage", "url": "https://annals.example"}],
                        "identifier": [
                            {"type": "pissn", "id": "1234-5678"},
                            {"type": "eissn", "id": "8765-4321"}
                        ],
                        "keywords": ["examples", "annals"]
                    }
                }]}"#,
            )
            .create_async()
            .await;

        let provider = DoajJournalsProvider::with_base_url(server.url());
        let results = provider.search(&SearchQuery::new("examples")).await.unwrap();

        assert_eq!(results.len(), 1);
        let hit = &results[0];
        assert_eq!(hit.source, SourceKind::DoajJournals);
        assert_eq!(hit.journal_name.as_deref(), Some("Annals of Examples"));
        assert_eq!(hit.publisher.as_deref(), Some("Example Press"));
        assert_eq!(hit.issn.as_deref(), Some("1234-5678, 8765-4321"));
        assert_eq!(hit.content_snippet, "Keywords: examples, annals");
        assert!(hit.authors.is_empty());
        assert!(hit.year.is_empty());
    }

    #[test]
    fn test_article_without_links_is_skipped() {
        let bibjson = DoajBibjson {
            title: Some("Linkless".to_string()),
            ..Default::default()
        };
        assert!(parse_article(bibjson).is_none());
    }

    #[test]
    fn test_single_sided_page_range() {
        let bibjson = DoajBibjson {
            title: Some("Partial pages".to_string()),
            link: vec![DoajLink {
                link_type: Some("fulltext".to_string()),
                url: Some("https://x.example".to_string()),
            }],
            start_page: Some("42".to_string()),
            ..Default::default()
        };
        let hit = parse_article(bibjson).unwrap();
        assert_eq!(hit.pages.as_deref(), Some("42"));
    }
}
