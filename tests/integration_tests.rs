//! Integration tests for bibliographer
//!
//! These tests drive the full flow: provider fan-out, merge, citation
//! formatting and library persistence, using mock providers.

use std::sync::Arc;

use bibliographer::library::{Library, MemoryStore};
use bibliographer::merge::{merge_search, MergePolicy, ProviderOutcome};
use bibliographer::models::{SearchResultBuilder, SourceKind};
use bibliographer::pipeline::ResearchPipeline;
use bibliographer::sources::{MockProvider, ProviderRegistry};
use bibliographer::utils::{format_citations, CitationStyle};

fn registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    // Web search knows the URL and a short snippet, nothing bibliographic
    registry.register(Arc::new(MockProvider::with_results(
        SourceKind::Tavily,
        vec![SearchResultBuilder::new(
            "AI in medicine",
            "https://sciencedirect.com/article/1",
            SourceKind::Tavily,
        )
        .snippet("Short teaser.")
        .build()],
    )));

    // Scholar adds authors/year/venue parsed out of its summary text
    registry.register(Arc::new(MockProvider::with_results(
        SourceKind::GoogleScholar,
        vec![SearchResultBuilder::new(
            "Artificial intelligence in medicine",
            "https://sciencedirect.com/article/1",
            SourceKind::GoogleScholar,
        )
        .snippet("A considerably longer abstract of the same article.")
        .authors("P. Hamet, J. Tremblay")
        .year("2017")
        .volume("69")
        .pages("S36-S40")
        .journal_name("Metabolism")
        .build()],
    )));

    // A second, unrelated hit from the article directory
    registry.register(Arc::new(MockProvider::with_results(
        SourceKind::DoajArticles,
        vec![SearchResultBuilder::new(
            "Open access metabolomics",
            "https://journal.example/article/9",
            SourceKind::DoajArticles,
        )
        .authors("Jane Doe, John Smith")
        .year("2019")
        .journal_name("Journal of Open Metabolomics")
        .build()],
    )));

    registry
}

#[tokio::test]
async fn test_full_search_flow() {
    let pipeline = ResearchPipeline::new(registry());
    let outcome = pipeline.search("ai in medicine").await;

    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.records.len(), 2);

    let merged = outcome
        .records
        .iter()
        .find(|r| r.url == "https://sciencedirect.com/article/1")
        .expect("merged record for shared URL");

    // Longer title/snippet won, scholar metadata back-filled the web hit
    assert_eq!(merged.title, "Artificial intelligence in medicine");
    assert_eq!(
        merged.content_snippet,
        "A considerably longer abstract of the same article."
    );
    assert_eq!(merged.authors, "P. Hamet, J. Tremblay");
    assert_eq!(merged.year, "2017");
    assert_eq!(merged.journal_name.as_deref(), Some("Metabolism"));
}

#[tokio::test]
async fn test_search_then_cite() {
    let outcome = ResearchPipeline::new(registry()).search("metabolomics").await;
    let record = outcome
        .records
        .iter()
        .find(|r| r.url == "https://journal.example/article/9")
        .unwrap();

    let citations = format_citations(record);
    assert!(citations.apa.contains("Doe, J. & Smith, J."));
    assert!(citations.apa.contains("(2019)."));
    assert!(citations
        .get(CitationStyle::Mla)
        .contains("\"Open access metabolomics.\""));
    assert!(citations.vancouver.contains("Doe J, Smith J."));
}

#[tokio::test]
async fn test_search_then_save_to_library() {
    let outcome = ResearchPipeline::new(registry()).search("ai in medicine").await;
    let mut record = outcome.records[0].clone();
    // The external summarization step fills these before saving
    record.summary = Some("LLM summary".to_string());
    record.annotation = Some("LLM annotation".to_string());

    let library = Library::new(MemoryStore::new());
    let folder = library.create_folder("AI papers").await.unwrap();
    let item = library.save_item(&record, &folder.id).await.unwrap();

    assert_eq!(item.summary, "LLM summary");
    assert_eq!(item.query, "ai in medicine");

    let listed = library.items(&folder.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].url, record.url);

    // Saved items format citations exactly like live records
    let citations = format_citations(&listed[0]);
    assert_eq!(citations.apa, format_citations(&record).apa);
}

#[tokio::test]
async fn test_partial_provider_failure_degrades_gracefully() {
    let mut registry = registry();
    registry.register(Arc::new(MockProvider::with_error(
        SourceKind::Exa,
        "503 temporarily unavailable",
    )));

    let outcome = ResearchPipeline::new(registry).search("ai in medicine").await;
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("Exa.ai"));
}

#[test]
fn test_merge_entry_point_directly() {
    // The merge layer is callable without the async pipeline
    let outcomes = vec![
        ProviderOutcome::ok(
            SourceKind::Tavily,
            vec![SearchResultBuilder::new("T", "https://x.example", SourceKind::Tavily).build()],
        ),
        ProviderOutcome::failed(SourceKind::GoogleScholar, "no quota"),
    ];

    let outcome = merge_search("q", "q", outcomes, &MergePolicy::default());
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.warnings.len(), 1);
}
