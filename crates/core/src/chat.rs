//! Question answering over the aggregated NASA records.
//!
//! A chat query first goes through the [`Aggregator`]. When NASA sources
//! return anything, the answer is assembled from those records and cites the
//! top five. Only when every source comes back empty does the responder ask
//! the [`TextGenerator`] fallback, and a failing fallback still produces a
//! well-formed answer.

use crate::aggregator::Aggregator;
use crate::traits::TextGenerator;
use crate::{ChatAnswer, Citation, FallbackError, SearchFilters, SearchQuery, SourceDocument};
use std::sync::Arc;
use tracing::{info, warn};

/// Records requested from the aggregator for a chat turn.
pub const CHAT_SEARCH_LIMIT: usize = 8;
/// Records cited in a NASA-backed answer.
pub const CITED_RECORDS: usize = 5;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "Gemini API key not configured. Please set GEMINI_API_KEY to enable general Q&A.";
pub const FALLBACK_FAILED_MESSAGE: &str =
    "The general Q&A fallback is unavailable right now. Please try again later.";

const GUIDANCE: &str = "These records include metadata such as mission context, organism, \
and assay type when available. Use the dashboard filters to refine by mission, organism, \
date range, or assay.";

pub struct ChatResponder {
    aggregator: Arc<Aggregator>,
    fallback: Arc<dyn TextGenerator>,
}

impl ChatResponder {
    pub fn new(aggregator: Arc<Aggregator>, fallback: Arc<dyn TextGenerator>) -> Self {
        Self {
            aggregator,
            fallback,
        }
    }

    /// `question` must already be normalized and non-empty.
    pub async fn answer(&self, question: &str, filters: SearchFilters) -> ChatAnswer {
        let query = SearchQuery {
            text: question.to_string(),
            filters,
            limit: CHAT_SEARCH_LIMIT,
        };

        let search = self.aggregator.aggregate(&query).await;
        if !search.is_empty() {
            info!(query = %question, total = search.total, "answering from NASA records");
            return nasa_answer(question, &search.results);
        }

        let generated = self.fallback.generate(question).await;
        if let Err(error) = &generated {
            warn!(%error, "generative fallback unavailable");
        }
        fallback_answer(question, generated)
    }
}

/// Builds the structured answer from ranked NASA records.
pub fn nasa_answer(question: &str, documents: &[SourceDocument]) -> ChatAnswer {
    let top = &documents[..documents.len().min(CITED_RECORDS)];

    let points = top
        .iter()
        .enumerate()
        .map(|(position, document)| finding_line(position + 1, document))
        .collect::<Vec<_>>()
        .join("\n");

    ChatAnswer {
        short_summary: format!(
            "Found {} relevant NASA records for \"{question}\" across OSDR/GeneLab, CMR, and NASA Images.",
            documents.len()
        ),
        detailed_answer: format!("Key findings:\n{points}\n\n{GUIDANCE}"),
        sources: top
            .iter()
            .enumerate()
            .map(|(position, document)| Citation {
                index: position + 1,
                title: document.title.clone(),
                link: document.link.clone(),
                source: document.source,
            })
            .collect(),
        follow_ups: [
            format!("Show experiments about {question} on rodent or plant models"),
            format!("List RNA-Seq assays related to {question} and provide processed files"),
        ],
        used_fallback: false,
    }
}

fn finding_line(index: usize, document: &SourceDocument) -> String {
    let mut line = format!("({index}) {}", document.title);
    for annotation in [&document.mission, &document.organism].into_iter().flatten() {
        line.push_str(" — ");
        line.push_str(annotation);
    }
    line
}

/// Packages the generator outcome into the same answer shape.
pub fn fallback_answer(question: &str, generated: Result<String, FallbackError>) -> ChatAnswer {
    let follow_ups = [
        format!("Try a different phrasing: {question} in spaceflight context"),
        "Ask about a specific mission or organism (e.g., Rodent Research, Arabidopsis).".to_string(),
    ];
    let unavailable_summary =
        format!("No NASA records found for \"{question}\" and Gemini fallback unavailable.");

    match generated {
        Ok(text) => ChatAnswer {
            short_summary: text.lines().take(2).collect::<Vec<_>>().join(" "),
            detailed_answer: text,
            sources: Vec::new(),
            follow_ups,
            used_fallback: true,
        },
        Err(FallbackError::MissingCredential) => ChatAnswer {
            short_summary: unavailable_summary,
            detailed_answer: NOT_CONFIGURED_MESSAGE.to_string(),
            sources: Vec::new(),
            follow_ups,
            used_fallback: false,
        },
        Err(_) => ChatAnswer {
            short_summary: unavailable_summary,
            detailed_answer: FALLBACK_FAILED_MESSAGE.to_string(),
            sources: Vec::new(),
            follow_ups,
            used_fallback: false,
        },
    }
}
