//! Bibliographic field extraction from free-text publication summaries.
//!
//! Search providers such as Google Scholar return publication metadata as a
//! single unstructured string (e.g. `"J. Smith, A. Doe - Nature, 2017,
//! 69(2), S36-S40"`). The heuristics here pull discrete fields out of that
//! text. Each step is a pure function; a step that finds nothing leaves its
//! field empty and never blocks the following steps. False negatives are
//! expected on this kind of input and are not guarded against beyond the
//! step ordering.

use regex::Regex;

/// Fields recovered from a publication summary string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub year: String,
    pub volume: String,
    pub pages: String,
    pub journal_name: String,
}

/// Run the full extraction pipeline over a publication summary.
///
/// `authors` is the already-known author string; when it appears literally
/// in the summary it is stripped before volume/pages/journal parsing so the
/// remaining text is mostly venue metadata.
pub fn extract_fields(summary: &str, authors: &str) -> ExtractedFields {
    let year = extract_year(summary);
    let reduced = strip_authors(summary, authors);
    let (volume, pages) = extract_volume_pages(&reduced, &year);
    let journal_name = extract_journal_name(&reduced, &volume, &pages);

    ExtractedFields {
        year,
        volume,
        pages,
        journal_name,
    }
}

/// First standalone 4-digit token, or empty.
pub fn extract_year(text: &str) -> String {
    let Ok(re) = Regex::new(r"\b(\d{4})\b") else {
        return String::new();
    };
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Remove the first literal occurrence of the author string, plus the
/// separator glued to it, leaving the venue part of the summary.
pub fn strip_authors(summary: &str, authors: &str) -> String {
    if authors.is_empty() || !summary.contains(authors) {
        return summary.to_string();
    }
    summary
        .replacen(authors, "", 1)
        .trim_matches(|c: char| c == ' ' || c == '-' || c == ',')
        .to_string()
}

/// Match `<volume>[(<issue>)]<sep><pages>` where pages is `S36-S40` style
/// supplement notation or a plain `36-40` range. Falls back to the first
/// standalone digit token that is not the year (volume only, no pages).
pub fn extract_volume_pages(text: &str, year: &str) -> (String, String) {
    if let Ok(re) = Regex::new(r"(\d+)(?:\((\d+)\))?(?:,\s*|:\s*|\s*)(S?\d+-S?\d+)") {
        if let Some(caps) = re.captures(text) {
            let volume = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
            let pages = caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default();
            return (volume, pages);
        }
    }

    // No volume+pages shape; take a lone digit token as the volume.
    if let Ok(re) = Regex::new(r"\b(\d+)\b") {
        for caps in re.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                if m.as_str() != year {
                    return (m.as_str().to_string(), String::new());
                }
            }
        }
    }

    (String::new(), String::new())
}

/// Whatever is left of the summary once year, volume, pages, stray digit
/// tokens and delimiter characters are stripped. Candidates of three
/// characters or fewer are noise, not a journal name.
pub fn extract_journal_name(reduced: &str, volume: &str, pages: &str) -> String {
    let mut candidate = reduced.to_string();

    if !volume.is_empty() {
        if let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(volume))) {
            candidate = re.replacen(&candidate, 1, "").to_string();
        }
    }
    if !pages.is_empty() {
        candidate = candidate.replacen(pages, "", 1);
    }

    // Drop every remaining bare digit token (the year included).
    if let Ok(re) = Regex::new(r"\b\d+\b") {
        candidate = re.replace_all(&candidate, "").to_string();
    }

    candidate = candidate
        .chars()
        .filter(|c| !matches!(c, ',' | ';' | ':' | '-' | '(' | ')'))
        .collect();
    let candidate = candidate.split_whitespace().collect::<Vec<_>>().join(" ");

    let candidate = candidate
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    if candidate.len() > 3 {
        candidate
    } else {
        String::new()
    }
}
