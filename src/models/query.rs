//! Search query parameters.

use serde::{Deserialize, Serialize};

/// Query parameters passed to every provider adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query string sent to the provider (already optimized, if an
    /// optimizer is in play)
    pub query: String,

    /// Maximum number of results to return
    pub max_results: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: 7,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = SearchQuery::new("machine learning").max_results(3);
        assert_eq!(query.query, "machine learning");
        assert_eq!(query.max_results, 3);
    }

    #[test]
    fn test_default_max_results() {
        assert_eq!(SearchQuery::new("x").max_results, 7);
    }
}
