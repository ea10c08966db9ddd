//! Mock provider for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{SearchQuery, SearchResult, SearchResultBuilder, SourceKind};
use crate::sources::{Provider, ProviderCapabilities, SourceError};

/// A mock provider that returns predefined results or a predefined error.
#[derive(Debug)]
pub struct MockProvider {
    kind: SourceKind,
    response: Mutex<Result<Vec<SearchResult>, String>>,
}

impl MockProvider {
    /// Create a mock provider that returns no results.
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            response: Mutex::new(Ok(Vec::new())),
        }
    }

    /// Create a mock provider returning the given results.
    pub fn with_results(kind: SourceKind, results: Vec<SearchResult>) -> Self {
        Self {
            kind,
            response: Mutex::new(Ok(results)),
        }
    }

    /// Create a mock provider that fails with the given error message.
    pub fn with_error(kind: SourceKind, error: impl Into<String>) -> Self {
        Self {
            kind,
            response: Mutex::new(Err(error.into())),
        }
    }

    /// Replace the configured response.
    pub fn set_results(&self, results: Vec<SearchResult>) {
        *self.response.lock().unwrap() = Ok(results);
    }

    /// Replace the configured response with an error.
    pub fn set_error(&self, error: impl Into<String>) {
        *self.response.lock().unwrap() = Err(error.into());
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn kind(&self) -> SourceKind {
        self.kind.clone()
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::SEARCH
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<SearchResult>, SourceError> {
        match &*self.response.lock().unwrap() {
            Ok(results) => Ok(results.clone()),
            Err(message) => Err(SourceError::Api(message.clone())),
        }
    }
}

/// Helper to build a minimal result for tests.
pub fn make_result(title: &str, url: &str, kind: SourceKind) -> SearchResult {
    SearchResultBuilder::new(title, url, kind).build()
}
