//! Citation formatting in various styles.
//!
//! Supports MLA 9th, APA 7th, Chicago 17th, Harvard and Vancouver formats.
//! Formatting is pure string work over already-merged records: no network,
//! no storage. Missing fields are omitted rather than placeholdered, so a
//! sparse record degrades to a shorter citation instead of an error.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{LibraryItem, MergedRecord};

/// Citation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CitationStyle {
    /// MLA 9th edition
    Mla,
    /// APA 7th edition
    Apa,
    /// Chicago 17th edition
    Chicago,
    /// Harvard
    Harvard,
    /// Vancouver
    Vancouver,
}

impl CitationStyle {
    /// All supported styles, in display order.
    pub const ALL: [CitationStyle; 5] = [
        CitationStyle::Mla,
        CitationStyle::Apa,
        CitationStyle::Chicago,
        CitationStyle::Harvard,
        CitationStyle::Vancouver,
    ];
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CitationStyle::Mla => write!(f, "MLA"),
            CitationStyle::Apa => write!(f, "APA"),
            CitationStyle::Chicago => write!(f, "Chicago"),
            CitationStyle::Harvard => write!(f, "Harvard"),
            CitationStyle::Vancouver => write!(f, "Vancouver"),
        }
    }
}

/// Anything a citation can be built from: a freshly merged record or an
/// item already persisted into the library.
pub trait Citable {
    fn title(&self) -> &str;
    fn authors(&self) -> &str;
    fn year(&self) -> &str;
    fn journal_name(&self) -> &str;
    fn volume(&self) -> &str;
    fn pages(&self) -> &str;
}

impl Citable for MergedRecord {
    fn title(&self) -> &str {
        &self.title
    }
    fn authors(&self) -> &str {
        &self.authors
    }
    fn year(&self) -> &str {
        &self.year
    }
    fn journal_name(&self) -> &str {
        self.journal_name.as_deref().unwrap_or("")
    }
    fn volume(&self) -> &str {
        self.volume.as_deref().unwrap_or("")
    }
    fn pages(&self) -> &str {
        self.pages.as_deref().unwrap_or("")
    }
}

impl Citable for LibraryItem {
    fn title(&self) -> &str {
        &self.title
    }
    fn authors(&self) -> &str {
        &self.authors
    }
    fn year(&self) -> &str {
        &self.year
    }
    fn journal_name(&self) -> &str {
        &self.journal_name
    }
    fn volume(&self) -> &str {
        &self.volume
    }
    fn pages(&self) -> &str {
        &self.pages
    }
}

/// All five citation strings for one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationSet {
    pub mla: String,
    pub apa: String,
    pub chicago: String,
    pub harvard: String,
    pub vancouver: String,
}

impl CitationSet {
    /// Look up one style's string.
    pub fn get(&self, style: CitationStyle) -> &str {
        match style {
            CitationStyle::Mla => &self.mla,
            CitationStyle::Apa => &self.apa,
            CitationStyle::Chicago => &self.chicago,
            CitationStyle::Harvard => &self.harvard,
            CitationStyle::Vancouver => &self.vancouver,
        }
    }

    /// Iterate (style, string) pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (CitationStyle, &str)> {
        CitationStyle::ALL
            .into_iter()
            .map(move |style| (style, self.get(style)))
    }
}

/// Format a record's citation in every supported style.
pub fn format_citations<T: Citable + ?Sized>(item: &T) -> CitationSet {
    CitationSet {
        mla: format_citation(item, CitationStyle::Mla),
        apa: format_citation(item, CitationStyle::Apa),
        chicago: format_citation(item, CitationStyle::Chicago),
        harvard: format_citation(item, CitationStyle::Harvard),
        vancouver: format_citation(item, CitationStyle::Vancouver),
    }
}

/// Format a record's citation in the specified style
pub fn format_citation<T: Citable + ?Sized>(item: &T, style: CitationStyle) -> String {
    match style {
        CitationStyle::Mla | CitationStyle::Chicago => format_mla(item),
        CitationStyle::Apa => format_apa(item),
        CitationStyle::Harvard => format_harvard(item),
        CitationStyle::Vancouver => format_vancouver(item),
    }
}

/// A personal name split into its citation-relevant halves.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedName {
    last: String,
    first: String,
}

/// Split a raw author string on `,` / `and` / `&` and parse each token.
fn split_and_parse_authors(authors: &str) -> Vec<ParsedName> {
    if authors.trim().is_empty() {
        return Vec::new();
    }

    let Ok(re) = regex::Regex::new(r",\s*| and | & ") else {
        return Vec::new();
    };

    re.split(authors)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(parse_name)
        .collect()
}

fn parse_name(name: &str) -> ParsedName {
    if let Some((last, first)) = name.split_once(',') {
        return ParsedName {
            last: last.trim().to_string(),
            first: first.trim().to_string(),
        };
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    match words.split_last() {
        Some((last, rest)) if !rest.is_empty() => ParsedName {
            last: (*last).to_string(),
            first: rest.join(" "),
        },
        _ => ParsedName {
            last: name.to_string(),
            first: String::new(),
        },
    }
}

/// Uppercased first letters of each given-name word, each followed by a
/// period ("Jane Mary" -> "J.M.").
fn initials_dotted(first: &str) -> String {
    first
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(|c| c.to_uppercase().chain(std::iter::once('.')))
        .collect()
}

/// Uppercased first letters, no periods ("Jane Mary" -> "JM").
fn initials_plain(first: &str) -> String {
    first
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

fn full_name(name: &ParsedName) -> String {
    format!("{}, {}", name.last, name.first)
        .trim_matches(|c| c == ',' || c == ' ')
        .to_string()
}

fn initialed_name(name: &ParsedName) -> String {
    format!("{}, {}", name.last, initials_dotted(&name.first))
        .trim_matches(|c| c == ',' || c == ' ')
        .to_string()
}

/// "Last, First" / "Last, First, and First Last" / "Last, First, et al."
fn format_authors_mla(authors: &str) -> String {
    let names = split_and_parse_authors(authors);
    match names.as_slice() {
        [] => String::new(),
        [only] => full_name(only),
        [a, b] => {
            let second = format!("{} {}", b.first, b.last).trim().to_string();
            format!("{}, and {}", full_name(a), second)
        }
        [a, ..] => format!("{}, et al.", full_name(a)),
    }
}

/// "Last, F." / "Last, F. & Last, F." / "Last, F. et al."
fn format_authors_apa(authors: &str) -> String {
    let names = split_and_parse_authors(authors);
    match names.as_slice() {
        [] => String::new(),
        [only] => initialed_name(only),
        [a, b] => format!("{} & {}", initialed_name(a), initialed_name(b)),
        [a, ..] => format!("{} et al.", initialed_name(a)),
    }
}

/// "Last, F." / "Last, F. and Last, F." / "Last, F. et al."
fn format_authors_harvard(authors: &str) -> String {
    let names = split_and_parse_authors(authors);
    match names.as_slice() {
        [] => String::new(),
        [only] => initialed_name(only),
        [a, b] => format!("{} and {}", initialed_name(a), initialed_name(b)),
        [a, ..] => format!("{} et al.", initialed_name(a)),
    }
}

/// "Last FI" with no periods, comma-joined, never truncated to "et al."
fn format_authors_vancouver(authors: &str) -> String {
    split_and_parse_authors(authors)
        .iter()
        .map(|name| {
            format!("{} {}", name.last, initials_plain(&name.first))
                .trim()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Join non-empty parts with single spaces.
fn join_parts(parts: &[String]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Append a closing period unless the text already ends in one.
fn close(text: String) -> String {
    if text.is_empty() || text.ends_with('.') {
        text
    } else {
        format!("{}.", text)
    }
}

fn comma_join(base: String, extra: &str) -> String {
    if base.is_empty() {
        extra.to_string()
    } else {
        format!("{}, {}", base, extra)
    }
}

/// Authors. "Title." Journal Volume (Year): Pages.
fn format_mla<T: Citable + ?Sized>(item: &T) -> String {
    let authors = close(format_authors_mla(item.authors()));
    let title = if item.title().is_empty() {
        String::new()
    } else {
        format!("\"{}.\"", item.title())
    };

    let mut venue = item.journal_name().to_string();
    if !item.volume().is_empty() {
        venue = join_parts(&[venue, item.volume().to_string()]);
    }
    if !item.year().is_empty() {
        venue = join_parts(&[venue, format!("({})", item.year())]);
    }
    if !item.pages().is_empty() {
        venue = format!("{}: {}", venue, item.pages())
            .trim_start_matches(": ")
            .trim()
            .to_string();
    }
    let venue = close(venue);

    join_parts(&[authors, title, venue])
}

/// Authors (Year). Title. Journal, Volume, Pages.
fn format_apa<T: Citable + ?Sized>(item: &T) -> String {
    let authors = format_authors_apa(item.authors());
    let year = if item.year().is_empty() {
        String::new()
    } else {
        format!("({}).", item.year())
    };
    let title = close(item.title().to_string());

    let mut venue = item.journal_name().to_string();
    if !item.volume().is_empty() {
        venue = comma_join(venue, item.volume());
    }
    if !item.pages().is_empty() {
        venue = comma_join(venue, item.pages());
    }
    let venue = close(venue);

    join_parts(&[authors, year, title, venue])
}

/// Authors Year. Title. Journal, Volume, pp.Pages.
fn format_harvard<T: Citable + ?Sized>(item: &T) -> String {
    let authors = format_authors_harvard(item.authors());
    let year = close(item.year().to_string());
    let title = close(item.title().to_string());

    let mut venue = item.journal_name().to_string();
    if !item.volume().is_empty() {
        venue = comma_join(venue, item.volume());
    }
    if !item.pages().is_empty() {
        venue = comma_join(venue, &format!("pp.{}", item.pages()));
    }
    let venue = close(venue);

    join_parts(&[authors, year, title, venue])
}

/// Authors. Title. Journal. Year Volume:Pages.
fn format_vancouver<T: Citable + ?Sized>(item: &T) -> String {
    let authors = close(format_authors_vancouver(item.authors()));
    let title = close(item.title().to_string());
    let journal = close(item.journal_name().to_string());

    let mut tail = item.year().to_string();
    if !item.volume().is_empty() {
        tail = join_parts(&[tail, item.volume().to_string()]);
    }
    if !item.pages().is_empty() {
        tail = format!("{}:{}", tail, item.pages())
            .trim_start_matches(':')
            .to_string();
    }
    let tail = close(tail);

    join_parts(&[authors, title, journal, tail])
}
