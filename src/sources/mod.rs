//! Search provider plugins with a trait-based architecture.
//!
//! This module defines the [`Provider`] trait that all search providers
//! implement. Five providers ship with the crate: Tavily (generic web
//! search), Google Scholar via SerpApi (academic search), Exa.ai (neural
//! search), and the DOAJ article and journal directories. New providers can
//! be added by implementing the trait and registering them with the
//! [`ProviderRegistry`].
//!
//! A provider never lets a failure escape as a panic: every error surfaces
//! as a [`SourceError`], which the merge layer turns into a warning string
//! while continuing with whatever succeeded.

mod doaj;
mod exa;
pub mod mock;
mod registry;
mod scholar;
mod tavily;

pub use doaj::{DoajArticlesProvider, DoajJournalsProvider};
pub use exa::ExaProvider;
pub use mock::MockProvider;
pub use registry::{ProviderCapabilities, ProviderRegistry};
pub use scholar::ScholarProvider;
pub use tavily::TavilyProvider;

use async_trait::async_trait;

use crate::models::{SearchQuery, SearchResult, SourceKind};

/// Academic publisher and aggregator domains used to bias web/neural search
/// toward scholarly sources. Providers with a native domain-filter parameter
/// receive this list verbatim.
pub const ACADEMIC_DOMAINS: [&str; 23] = [
    "pubmed.ncbi.nlm.nih.gov",
    "sciencedirect.com",
    "springer.com",
    "elsevier.com",
    "wiley.com",
    "ieee.org",
    "acm.org",
    "mdpi.com",
    "nature.com",
    "science.org",
    "frontiersin.org",
    "plos.org",
    "bmj.com",
    "jamanetwork.com",
    "nejm.org",
    "arxiv.org",
    "biorxiv.org",
    "jstor.org",
    "cambridge.org",
    "oup.com",
    "tandfonline.com",
    "researchgate.net",
    "doaj.org",
];

/// The Provider trait defines the interface for all search provider plugins.
///
/// # Implementing a New Provider
///
/// 1. Create a struct holding its own HTTP client and credentials
///    (no global/shared client state; instances are injected explicitly)
/// 2. Implement `kind` and `search`
/// 3. Declare capabilities if the provider supports more than plain search
/// 4. Register it with [`ProviderRegistry::register`]
#[async_trait]
pub trait Provider: Send + Sync + std::fmt::Debug {
    /// Identity of this provider; also its rank key in the merge policy.
    fn kind(&self) -> SourceKind;

    /// Describe the capabilities of this provider
    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::SEARCH
    }

    /// Whether this provider applies the academic domain allow-list
    fn supports_domain_filter(&self) -> bool {
        self.capabilities()
            .contains(ProviderCapabilities::DOMAIN_FILTER)
    }

    /// Whether this provider returns structured bibliographic fields
    /// (as opposed to free text run through the extraction heuristics)
    fn has_structured_metadata(&self) -> bool {
        self.capabilities()
            .contains(ProviderCapabilities::STRUCTURED_METADATA)
    }

    /// Search for results matching the query.
    ///
    /// Zero hits is a success with an empty list, not an error.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, SourceError>;
}

/// Errors that can occur when calling a provider
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Parsing error (JSON payload did not match the expected shape)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Error reported by the provider's API itself
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
