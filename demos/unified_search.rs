//! End-to-end demo of the search pipeline, running against mock providers
//! so it works without API keys. With real keys configured (TAVILY_API_KEY,
//! SERPAPI_API_KEY, EXA_API_KEY) swap in `ProviderRegistry::from_config`.
//!
//! Run with: cargo run --example unified_search

use std::sync::Arc;

use anyhow::Result;
use bibliographer::config::Config;
use bibliographer::library::{Library, MemoryStore};
use bibliographer::models::{SearchResultBuilder, SourceKind};
use bibliographer::pipeline::ResearchPipeline;
use bibliographer::sources::{MockProvider, ProviderRegistry};
use bibliographer::utils::format_citations;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::default();
    let registry = if config.api_keys.tavily.is_some() {
        tracing::info!("using live providers from configuration");
        ProviderRegistry::from_config(&config)
    } else {
        tracing::info!("no API keys configured, using mock providers");
        mock_registry()
    };

    let pipeline = ResearchPipeline::new(registry).with_max_results(config.search.max_results);
    let outcome = pipeline.search("artificial intelligence in medicine").await;

    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }

    println!("{} merged records\n", outcome.records.len());
    for record in &outcome.records {
        println!("- {} ({})", record.title, record.url);
        if !record.authors.is_empty() {
            println!("  authors: {}", record.authors);
        }
        let citations = format_citations(record);
        println!("  APA: {}", citations.apa);
        println!("  Vancouver: {}", citations.vancouver);
    }

    // File the first record into an in-memory library
    if let Some(record) = outcome.records.first() {
        let library = Library::new(MemoryStore::new());
        let folder = library.create_folder("demo").await?;
        let item = library.save_item(record, &folder.id).await?;
        println!("\nsaved \"{}\" into folder \"{}\"", item.title, folder.name);
    }

    Ok(())
}

fn mock_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(MockProvider::with_results(
        SourceKind::Tavily,
        vec![SearchResultBuilder::new(
            "AI in medicine",
            "https://sciencedirect.com/article/1",
            SourceKind::Tavily,
        )
        .snippet("Short teaser about AI in medicine.")
        .build()],
    )));
    registry.register(Arc::new(MockProvider::with_results(
        SourceKind::GoogleScholar,
        vec![SearchResultBuilder::new(
            "Artificial intelligence in medicine",
            "https://sciencedirect.com/article/1",
            SourceKind::GoogleScholar,
        )
        .snippet("A longer abstract of the same article, with venue metadata.")
        .authors("P. Hamet, J. Tremblay")
        .year("2017")
        .volume("69")
        .pages("S36-S40")
        .journal_name("Metabolism")
        .build()],
    )));
    registry
}
