//! Search result and merged record models.

use serde::{Deserialize, Serialize};

/// The provider a result came from.
///
/// Doubles as the provider identity used by the merge precedence policy:
/// later kinds in [`DEFAULT_PRECEDENCE`] are treated as more authoritative
/// for bibliographic metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Tavily,
    GoogleScholar,
    Exa,
    DoajArticles,
    DoajJournals,
    #[serde(untagged)]
    Other(String),
}

/// Default merge precedence, least authoritative first.
pub const DEFAULT_PRECEDENCE: [SourceKind; 5] = [
    SourceKind::Tavily,
    SourceKind::GoogleScholar,
    SourceKind::Exa,
    SourceKind::DoajArticles,
    SourceKind::DoajJournals,
];

impl SourceKind {
    /// Returns the display name of the provider
    pub fn name(&self) -> &str {
        match self {
            SourceKind::Tavily => "Tavily",
            SourceKind::GoogleScholar => "Google Scholar",
            SourceKind::Exa => "Exa.ai",
            SourceKind::DoajArticles => "DOAJ Articles",
            SourceKind::DoajJournals => "DOAJ Journals",
            SourceKind::Other(s) => s,
        }
    }

    /// Returns the provider identifier (for config and warnings)
    pub fn id(&self) -> &str {
        match self {
            SourceKind::Tavily => "tavily",
            SourceKind::GoogleScholar => "google_scholar",
            SourceKind::Exa => "exa",
            SourceKind::DoajArticles => "doaj_articles",
            SourceKind::DoajJournals => "doaj_journals",
            SourceKind::Other(s) => s,
        }
    }

    /// Label stored in a result's `source_type` field.
    pub fn label(&self) -> &str {
        match self {
            SourceKind::Tavily => "Website",
            SourceKind::GoogleScholar => "Google Scholar Article",
            SourceKind::Exa => "Exa.ai Search",
            SourceKind::DoajArticles => "DOAJ Article",
            SourceKind::DoajJournals => "DOAJ Journal",
            SourceKind::Other(s) => s,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One hit from one provider, normalized to a common shape.
///
/// Adapters map their provider's native response into this record; the
/// merger reconciles records sharing a URL. A record with an empty `url`
/// is never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,

    /// Landing URL; the merge key. Must be non-empty to take part in a merge.
    pub url: String,

    /// Snippet or abstract text supplied by the provider
    pub content_snippet: String,

    /// Provider that produced this record
    pub source: SourceKind,

    /// Raw author string (comma/and-separated, format varies by provider)
    pub authors: String,

    /// Publication year ("", "N.D." or a 4-digit string)
    pub year: String,

    /// Direct PDF link
    pub pdf_url: Option<String>,

    /// Main publication page, when distinct from `url`
    pub main_pub_url: Option<String>,

    /// Digital Object Identifier
    pub doi: Option<String>,

    /// Journal title
    pub journal_name: Option<String>,

    /// Journal volume
    pub volume: Option<String>,

    /// Page range
    pub pages: Option<String>,

    /// Publisher (journal-directory entries only)
    pub publisher: Option<String>,

    /// ISSN(s), comma-separated (journal-directory entries only)
    pub issn: Option<String>,
}

impl SearchResult {
    /// Create a new result with required fields
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: SourceKind) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content_snippet: String::new(),
            source,
            authors: String::new(),
            year: String::new(),
            pdf_url: None,
            main_pub_url: None,
            doi: None,
            journal_name: None,
            volume: None,
            pages: None,
            publisher: None,
            issn: None,
        }
    }

    /// Whether this record can take part in a merge.
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// Builder for constructing SearchResult records
#[derive(Debug, Clone)]
pub struct SearchResultBuilder {
    result: SearchResult,
}

impl SearchResultBuilder {
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: SourceKind) -> Self {
        Self {
            result: SearchResult::new(title, url, source),
        }
    }

    pub fn snippet(mut self, snippet: impl Into<String>) -> Self {
        self.result.content_snippet = snippet.into();
        self
    }

    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.result.authors = authors.into();
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.result.year = year.into();
        self
    }

    pub fn pdf_url(mut self, url: impl Into<String>) -> Self {
        self.result.pdf_url = non_empty(url.into());
        self
    }

    pub fn main_pub_url(mut self, url: impl Into<String>) -> Self {
        self.result.main_pub_url = non_empty(url.into());
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.result.doi = non_empty(doi.into());
        self
    }

    pub fn journal_name(mut self, name: impl Into<String>) -> Self {
        self.result.journal_name = non_empty(name.into());
        self
    }

    pub fn volume(mut self, volume: impl Into<String>) -> Self {
        self.result.volume = non_empty(volume.into());
        self
    }

    pub fn pages(mut self, pages: impl Into<String>) -> Self {
        self.result.pages = non_empty(pages.into());
        self
    }

    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.result.publisher = non_empty(publisher.into());
        self
    }

    pub fn issn(mut self, issn: impl Into<String>) -> Self {
        self.result.issn = non_empty(issn.into());
        self
    }

    pub fn build(self) -> SearchResult {
        self.result
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// One record per distinct URL across all providers for a single query.
///
/// Field values are the best available value across contributing providers.
/// `summary` and `annotation` are filled by an external summarization step
/// after the merge and are never touched by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedRecord {
    pub title: String,
    pub url: String,
    pub content_snippet: String,
    pub source: SourceKind,
    pub authors: String,
    pub year: String,
    pub pdf_url: Option<String>,
    pub main_pub_url: Option<String>,
    pub doi: Option<String>,
    pub journal_name: Option<String>,
    pub volume: Option<String>,
    pub pages: Option<String>,
    pub publisher: Option<String>,
    pub issn: Option<String>,

    /// Original user query
    pub query: String,

    /// Provider-tuned query actually sent to the providers
    pub optimized_query: String,

    /// Externally generated summary
    pub summary: Option<String>,

    /// Externally generated annotated-bibliography entry
    pub annotation: Option<String>,
}

impl MergedRecord {
    /// Seed a merged record from the first result seen for a URL.
    pub fn from_result(
        result: SearchResult,
        query: impl Into<String>,
        optimized_query: impl Into<String>,
    ) -> Self {
        Self {
            title: result.title,
            url: result.url,
            content_snippet: result.content_snippet,
            source: result.source,
            authors: result.authors,
            year: result.year,
            pdf_url: result.pdf_url,
            main_pub_url: result.main_pub_url,
            doi: result.doi,
            journal_name: result.journal_name,
            volume: result.volume,
            pages: result.pages,
            publisher: result.publisher,
            issn: result.issn,
            query: query.into(),
            optimized_query: optimized_query.into(),
            summary: None,
            annotation: None,
        }
    }
}
