//! Multi-provider search result reconciliation.
//!
//! Every provider contributes a list of [`SearchResult`]s for the same
//! query; this module folds them into one [`MergedRecord`] per distinct URL.
//! Providers are processed in a fixed precedence order (by provider
//! identity, never by arrival time), so running the adapters concurrently
//! cannot change the merged output. A failing provider contributes nothing
//! except a warning string; the merge itself never fails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{MergedRecord, SearchResult, SourceKind, DEFAULT_PRECEDENCE};

/// What one provider produced for a query: its results, or an error
/// description when the call failed.
#[derive(Debug, Clone)]
pub struct ProviderOutcome {
    pub provider: SourceKind,
    pub results: Vec<SearchResult>,
    pub error: Option<String>,
}

impl ProviderOutcome {
    /// A successful outcome.
    pub fn ok(provider: SourceKind, results: Vec<SearchResult>) -> Self {
        Self {
            provider,
            results,
            error: None,
        }
    }

    /// A failed outcome; contributes no results, one warning.
    pub fn failed(provider: SourceKind, error: impl Into<String>) -> Self {
        Self {
            provider,
            results: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Provider precedence used to resolve field conflicts, least authoritative
/// first. The default order ranks directory-style sources above plain web
/// search for bibliographic metadata; treat it as a policy knob rather than
/// a fact about the providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergePolicy {
    precedence: Vec<SourceKind>,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            precedence: DEFAULT_PRECEDENCE.to_vec(),
        }
    }
}

impl MergePolicy {
    pub fn new(precedence: Vec<SourceKind>) -> Self {
        Self { precedence }
    }

    /// Rank of a provider in this policy; unlisted providers sort after
    /// every listed one.
    pub fn rank(&self, provider: &SourceKind) -> usize {
        self.precedence
            .iter()
            .position(|p| p == provider)
            .unwrap_or(self.precedence.len())
    }
}

/// The merged view of one query plus per-provider failure warnings.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub records: Vec<MergedRecord>,
    pub warnings: Vec<String>,
}

/// Merge per-provider result lists into one record per URL.
///
/// `query` is the original user query and `optimized_query` the tuned query
/// the providers were actually called with; both are stamped onto every
/// merged record. Records without a URL are dropped without a warning
/// (malformed adapter output is an adapter bug, not a user-facing
/// condition).
pub fn merge_search(
    query: &str,
    optimized_query: &str,
    mut outcomes: Vec<ProviderOutcome>,
    policy: &MergePolicy,
) -> MergeOutcome {
    outcomes.sort_by_key(|outcome| policy.rank(&outcome.provider));

    let mut warnings = Vec::new();
    let mut merged: BTreeMap<String, MergedRecord> = BTreeMap::new();

    for outcome in outcomes {
        if let Some(error) = &outcome.error {
            tracing::warn!(provider = outcome.provider.id(), %error, "provider failed");
            warnings.push(format!("{} search failed: {}", outcome.provider.name(), error));
        }

        for result in outcome.results {
            if !result.has_url() {
                tracing::debug!(
                    provider = result.source.id(),
                    title = %result.title,
                    "dropping result without URL"
                );
                continue;
            }

            match merged.get_mut(&result.url) {
                None => {
                    merged.insert(
                        result.url.clone(),
                        MergedRecord::from_result(result, query, optimized_query),
                    );
                }
                Some(existing) => absorb(existing, result),
            }
        }
    }

    MergeOutcome {
        records: merged.into_values().collect(),
        warnings,
    }
}

/// Fold a later-precedence result into an existing record.
///
/// Scalar fields: a non-empty incoming value replaces the old one; an empty
/// incoming value never erases anything. `title` and `content_snippet`
/// instead keep the longer string. `summary` and `annotation` belong to the
/// external summarization step and are never touched here.
fn absorb(record: &mut MergedRecord, result: SearchResult) {
    keep_longer(&mut record.title, result.title);
    keep_longer(&mut record.content_snippet, result.content_snippet);

    record.source = result.source;

    prefer_new(&mut record.authors, result.authors);
    prefer_new(&mut record.year, result.year);

    prefer_new_opt(&mut record.pdf_url, result.pdf_url);
    prefer_new_opt(&mut record.main_pub_url, result.main_pub_url);
    prefer_new_opt(&mut record.doi, result.doi);
    prefer_new_opt(&mut record.journal_name, result.journal_name);
    prefer_new_opt(&mut record.volume, result.volume);
    prefer_new_opt(&mut record.pages, result.pages);
    prefer_new_opt(&mut record.publisher, result.publisher);
    prefer_new_opt(&mut record.issn, result.issn);
}

fn prefer_new(old: &mut String, new: String) {
    if !new.is_empty() {
        *old = new;
    }
}

fn prefer_new_opt(old: &mut Option<String>, new: Option<String>) {
    if let Some(value) = new {
        if !value.is_empty() {
            *old = Some(value);
        }
    }
}

/// Longer-string-wins heuristic for title/snippet. A longer scraped
/// fragment is assumed to carry more information; that assumption is not
/// guaranteed, and this is the single place to swap in a precedence rule
/// should it misbehave.
fn keep_longer(old: &mut String, new: String) {
    if new.len() > old.len() {
        *old = new;
    }
}
