//! Personal library models: folders and saved items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{MergedRecord, SourceKind};

/// A named folder grouping saved library items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Folder identifier (UUID string)
    pub id: String,

    /// Display name
    pub name: String,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// A search result persisted into the library, with its externally
/// generated summary/annotation attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryItem {
    /// Item identifier (UUID string)
    pub id: String,

    pub title: String,
    pub url: String,

    /// Original user query that surfaced this item
    pub query: String,

    pub summary: String,
    pub annotation: String,
    pub content_snippet: String,

    /// Owning folder id; empty string means the root view
    pub folder_id: String,

    pub added_at: DateTime<Utc>,

    pub source: SourceKind,
    pub authors: String,
    pub year: String,
    pub pdf_url: String,
    pub main_pub_url: String,
    pub doi: String,
    pub journal_name: String,
    pub volume: String,
    pub pages: String,
    pub publisher: String,
    pub issn: String,
}

impl LibraryItem {
    /// Build an item from a merged record, flattening optional fields to
    /// empty strings the way the store represents absence.
    pub fn from_record(record: &MergedRecord, folder_id: impl Into<String>) -> Self {
        let opt = |field: &Option<String>| field.clone().unwrap_or_default();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: if record.title.is_empty() {
                "Untitled".to_string()
            } else {
                record.title.clone()
            },
            url: record.url.clone(),
            query: record.query.clone(),
            summary: opt(&record.summary),
            annotation: opt(&record.annotation),
            content_snippet: record.content_snippet.clone(),
            folder_id: folder_id.into(),
            added_at: Utc::now(),
            source: record.source.clone(),
            authors: record.authors.clone(),
            year: record.year.clone(),
            pdf_url: opt(&record.pdf_url),
            main_pub_url: opt(&record.main_pub_url),
            doi: opt(&record.doi),
            journal_name: opt(&record.journal_name),
            volume: opt(&record.volume),
            pages: opt(&record.pages),
            publisher: opt(&record.publisher),
            issn: opt(&record.issn),
        }
    }

    /// Whether the item lives in the root view rather than a folder.
    pub fn is_root(&self) -> bool {
        self.folder_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchResult;

    #[test]
    fn test_from_record_flattens_optionals() {
        let mut result = SearchResult::new("Paper", "https://example.com", SourceKind::Exa);
        result.journal_name = Some("Nature".to_string());
        let mut record = MergedRecord::from_result(result, "q", "q opt");
        record.summary = Some("a summary".to_string());

        let item = LibraryItem::from_record(&record, "");
        assert_eq!(item.journal_name, "Nature");
        assert_eq!(item.summary, "a summary");
        assert_eq!(item.doi, "");
        assert!(item.is_root());
    }

    #[test]
    fn test_from_record_untitled_fallback() {
        let result = SearchResult::new("", "https://example.com", SourceKind::Tavily);
        let record = MergedRecord::from_result(result, "q", "q");
        let item = LibraryItem::from_record(&record, "abc");
        assert_eq!(item.title, "Untitled");
        assert!(!item.is_root());
    }
}
