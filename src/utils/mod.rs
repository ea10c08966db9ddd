//! Utility modules supporting search and citation operations.
//!
//! - [`extract`]: bibliographic field extraction from free-text
//!   publication summaries
//! - [`cite`]: citation formatting in MLA, APA, Chicago, Harvard and
//!   Vancouver styles
//! - [`HttpClient`]: shared HTTP client with sensible defaults
//! - [`with_retry`]/[`RetryConfig`]: automatic retry on transient errors

pub mod cite;
pub mod extract;
mod http;
mod retry;

pub use cite::{format_citation, format_citations, Citable, CitationSet, CitationStyle};
pub use extract::{extract_fields, ExtractedFields};
pub use http::HttpClient;
pub use retry::{api_retry_config, with_retry, RetryConfig, TransientError};
