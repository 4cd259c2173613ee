use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;
pub const MAX_QUERY_CHARS: usize = 500;

/// Origin of a normalized record. Drives ranking and UI grouping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    Genelab,
    Osdr,
    Cmr,
    Images,
    Lsda,
    Radlab,
    OpenData,
    Other,
}

impl SourceKind {
    /// Fixed ranking weight; the only signal the aggregator sorts by.
    pub fn priority(self) -> u8 {
        match self {
            SourceKind::Genelab => 3,
            SourceKind::Osdr => 2,
            SourceKind::Cmr | SourceKind::Images => 1,
            _ => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Genelab => "GENELAB",
            SourceKind::Osdr => "OSDR",
            SourceKind::Cmr => "CMR",
            SourceKind::Images => "IMAGES",
            SourceKind::Lsda => "LSDA",
            SourceKind::Radlab => "RADLAB",
            SourceKind::OpenData => "OPEN_DATA",
            SourceKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical record every adapter maps its upstream JSON into.
///
/// Optional fields serialize as `null` rather than being skipped so that
/// consumers can rely on every key being present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub source: SourceKind,
    pub mission: Option<String>,
    pub organism: Option<String>,
    pub assay: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub mission: Option<String>,
    pub organism: Option<String>,
    pub assay_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub text: String,
    pub filters: SearchFilters,
    pub limit: usize,
}

impl SearchQuery {
    /// Builds a query from raw caller input: trims, caps the length at
    /// [`MAX_QUERY_CHARS`] characters and resolves the limit. Returns `None`
    /// when nothing searchable is left.
    pub fn from_input(
        raw: &str,
        filters: Option<SearchFilters>,
        limit: Option<usize>,
    ) -> Option<Self> {
        let text = normalize_query(raw);
        if text.is_empty() {
            return None;
        }

        Some(Self {
            text,
            filters: filters.unwrap_or_default(),
            limit: resolve_limit(limit),
        })
    }
}

pub fn normalize_query(raw: &str) -> String {
    raw.trim()
        .chars()
        .take(MAX_QUERY_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

pub fn resolve_limit(limit: Option<usize>) -> usize {
    match limit {
        None | Some(0) => DEFAULT_LIMIT,
        Some(value) => value.min(MAX_LIMIT),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AggregatedResult {
    pub total: usize,
    pub results: Vec<SourceDocument>,
}

impl AggregatedResult {
    pub fn new(results: Vec<SourceDocument>) -> Self {
        Self {
            total: results.len(),
            results,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    pub index: usize,
    pub title: String,
    pub link: String,
    pub source: SourceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatAnswer {
    pub short_summary: String,
    pub detailed_answer: String,
    pub sources: Vec<Citation>,
    pub follow_ups: [String; 2],
    pub used_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleItem {
    pub id: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub image: Option<String>,
    pub link: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ArticlesResponse {
    pub items: Vec<ArticleItem>,
}
