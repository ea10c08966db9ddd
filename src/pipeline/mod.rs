//! Unified search pipeline: optimize the query, fan out to every
//! registered provider concurrently, then reconcile the results.
//!
//! Provider calls share no mutable state and complete in any order; the
//! merge applies precedence by provider identity, so concurrent execution
//! cannot change the outcome. A provider that fails or times out degrades
//! to an empty contribution plus one warning.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::merge::{merge_search, MergeOutcome, MergePolicy, ProviderOutcome};
use crate::models::SearchQuery;
use crate::sources::{ProviderRegistry, SourceError};

/// Query optimization seam.
///
/// The production optimizer is an LLM-backed service that rewrites a
/// natural-language question into keyword form; it lives outside this
/// crate. The pipeline only depends on this trait and falls back to the
/// raw query when optimization fails.
#[async_trait]
pub trait QueryOptimizer: Send + Sync + std::fmt::Debug {
    async fn optimize(&self, raw_query: &str) -> Result<String, SourceError>;
}

/// Passthrough optimizer: the raw query is used as-is.
#[derive(Debug, Clone, Default)]
pub struct NoopOptimizer;

#[async_trait]
impl QueryOptimizer for NoopOptimizer {
    async fn optimize(&self, raw_query: &str) -> Result<String, SourceError> {
        Ok(raw_query.to_string())
    }
}

/// One query's full search flow, with all collaborators injected.
#[derive(Debug)]
pub struct ResearchPipeline {
    registry: ProviderRegistry,
    optimizer: Arc<dyn QueryOptimizer>,
    policy: MergePolicy,
    max_results: usize,
}

impl ResearchPipeline {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            optimizer: Arc::new(NoopOptimizer),
            policy: MergePolicy::default(),
            max_results: SearchQuery::default().max_results,
        }
    }

    /// Inject a query optimizer
    pub fn with_optimizer(mut self, optimizer: Arc<dyn QueryOptimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Override the merge precedence policy
    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set per-provider result cap
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Run one query end to end: optimize, fan out, merge.
    ///
    /// Never fails: the worst outcome is an empty record list alongside one
    /// warning per failed collaborator.
    pub async fn search(&self, query: &str) -> MergeOutcome {
        let mut warnings = Vec::new();

        let optimized = match self.optimizer.optimize(query).await {
            Ok(optimized) if !optimized.trim().is_empty() => optimized,
            Ok(_) => query.to_string(),
            Err(error) => {
                tracing::warn!(%error, "query optimization failed, using raw query");
                warnings.push(format!("Query optimization failed: {}", error));
                query.to_string()
            }
        };

        let search_query = SearchQuery::new(&optimized).max_results(self.max_results);

        let calls = self.registry.all().map(|provider| {
            let provider = Arc::clone(provider);
            let search_query = search_query.clone();
            async move {
                match provider.search(&search_query).await {
                    Ok(results) => {
                        tracing::debug!(
                            provider = provider.kind().id(),
                            hits = results.len(),
                            "provider search complete"
                        );
                        ProviderOutcome::ok(provider.kind(), results)
                    }
                    Err(error) => ProviderOutcome::failed(provider.kind(), error.to_string()),
                }
            }
        });

        let outcomes = join_all(calls).await;

        let mut outcome = merge_search(query, &optimized, outcomes, &self.policy);
        if !warnings.is_empty() {
            warnings.append(&mut outcome.warnings);
            outcome.warnings = warnings;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SearchResultBuilder, SourceKind};
    use crate::sources::mock::{make_result, MockProvider};

    fn registry_with(providers: Vec<MockProvider>) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        for provider in providers {
            registry.register(Arc::new(provider));
        }
        registry
    }

    #[derive(Debug)]
    struct KeywordOptimizer;

    #[async_trait]
    impl QueryOptimizer for KeywordOptimizer {
        async fn optimize(&self, _raw_query: &str) -> Result<String, SourceError> {
            Ok("tuned keywords".to_string())
        }
    }

    #[derive(Debug)]
    struct FailingOptimizer;

    #[async_trait]
    impl QueryOptimizer for FailingOptimizer {
        async fn optimize(&self, _raw_query: &str) -> Result<String, SourceError> {
            Err(SourceError::Api("model unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_search_merges_across_providers() {
        let registry = registry_with(vec![
            MockProvider::with_results(
                SourceKind::Tavily,
                vec![make_result("A", "https://a.example", SourceKind::Tavily)],
            ),
            MockProvider::with_results(
                SourceKind::Exa,
                vec![
                    make_result("A", "https://a.example", SourceKind::Exa),
                    make_result("B", "https://b.example", SourceKind::Exa),
                ],
            ),
        ]);

        let outcome = ResearchPipeline::new(registry).search("query").await;
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_optimizer_output_stamped_on_records() {
        let registry = registry_with(vec![MockProvider::with_results(
            SourceKind::Tavily,
            vec![make_result("A", "https://a.example", SourceKind::Tavily)],
        )]);

        let outcome = ResearchPipeline::new(registry)
            .with_optimizer(Arc::new(KeywordOptimizer))
            .search("what are the papers about x?")
            .await;

        assert_eq!(outcome.records[0].query, "what are the papers about x?");
        assert_eq!(outcome.records[0].optimized_query, "tuned keywords");
    }

    #[tokio::test]
    async fn test_optimizer_failure_falls_back_to_raw_query() {
        let registry = registry_with(vec![MockProvider::with_results(
            SourceKind::Tavily,
            vec![make_result("A", "https://a.example", SourceKind::Tavily)],
        )]);

        let outcome = ResearchPipeline::new(registry)
            .with_optimizer(Arc::new(FailingOptimizer))
            .search("raw query")
            .await;

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].optimized_query, "raw query");
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("optimization"));
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_warning() {
        let registry = registry_with(vec![
            MockProvider::with_error(SourceKind::GoogleScholar, "quota exhausted"),
            MockProvider::with_results(
                SourceKind::Exa,
                vec![make_result("B", "https://b.example", SourceKind::Exa)],
            ),
        ]);

        let outcome = ResearchPipeline::new(registry).search("query").await;
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("Google Scholar"));
    }

    #[tokio::test]
    async fn test_all_providers_failing_never_errors() {
        let registry = registry_with(vec![
            MockProvider::with_error(SourceKind::Tavily, "down"),
            MockProvider::with_error(SourceKind::Exa, "down"),
        ]);

        let outcome = ResearchPipeline::new(registry).search("query").await;
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.warnings.len(), 2);
    }

    #[tokio::test]
    async fn test_precedence_applied_regardless_of_registration_order() {
        // Registered authoritative-first; the merge must still let the
        // directory value win over the web value.
        let registry = registry_with(vec![
            MockProvider::with_results(
                SourceKind::DoajArticles,
                vec![SearchResultBuilder::new(
                    "A",
                    "https://a.example",
                    SourceKind::DoajArticles,
                )
                .year("2021")
                .build()],
            ),
            MockProvider::with_results(
                SourceKind::Tavily,
                vec![SearchResultBuilder::new("A", "https://a.example", SourceKind::Tavily)
                    .year("1999")
                    .build()],
            ),
        ]);

        let outcome = ResearchPipeline::new(registry).search("query").await;
        assert_eq!(outcome.records[0].year, "2021");
    }
}
