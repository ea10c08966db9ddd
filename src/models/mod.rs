//! Core data models for search results, merged records and the library.

mod library;
mod query;
mod record;

pub use library::{Folder, LibraryItem};
pub use query::SearchQuery;
pub use record::{
    MergedRecord, SearchResult, SearchResultBuilder, SourceKind, DEFAULT_PRECEDENCE,
};
