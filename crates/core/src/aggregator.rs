use crate::config::NasaEndpoints;
use crate::http::NasaHttp;
use crate::sources::{CmrSource, GeneLabSource, ImagesSource, OsdrSource};
use crate::traits::DocumentSource;
use crate::{AggregatedResult, SearchQuery, SourceDocument, SourceError, SourceKind};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// What one source contributed to an aggregation.
///
/// `Unavailable` only feeds logging; callers always get a document list.
#[derive(Debug)]
pub enum SourceOutcome {
    Documents {
        source: SourceKind,
        documents: Vec<SourceDocument>,
    },
    Unavailable {
        source: SourceKind,
        reason: String,
    },
}

impl SourceOutcome {
    pub fn from_result(source: SourceKind, result: Result<Vec<SourceDocument>, SourceError>) -> Self {
        match result {
            Ok(documents) => SourceOutcome::Documents { source, documents },
            Err(error) => SourceOutcome::Unavailable {
                source,
                reason: error.to_string(),
            },
        }
    }

    pub fn into_documents(self) -> Vec<SourceDocument> {
        match self {
            SourceOutcome::Documents { source, documents } => {
                debug!(%source, count = documents.len(), "source answered");
                documents
            }
            SourceOutcome::Unavailable { source, reason } => {
                warn!(%source, %reason, "source unavailable, continuing without it");
                Vec::new()
            }
        }
    }
}

/// Fans a query out to every registered source and merges the answers.
pub struct Aggregator {
    sources: Vec<Arc<dyn DocumentSource>>,
}

impl Aggregator {
    /// Sources are concatenated in the order given here, which is also the
    /// tie-break order for equal priorities.
    pub fn new(sources: Vec<Arc<dyn DocumentSource>>) -> Self {
        Self { sources }
    }

    /// GeneLab, OSDR, CMR, Images against the given endpoints.
    pub fn nasa(http: NasaHttp, endpoints: &NasaEndpoints) -> Result<Self, SourceError> {
        let osdr: Arc<dyn DocumentSource> = Arc::new(OsdrSource::new(http.clone(), &endpoints.osdr));
        let genelab = GeneLabSource::new(osdr.clone())?;

        Ok(Self::new(vec![
            Arc::new(genelab),
            osdr,
            Arc::new(CmrSource::new(http.clone(), &endpoints.cmr)),
            Arc::new(ImagesSource::new(http, &endpoints.images)),
        ]))
    }

    pub fn source_kinds(&self) -> Vec<SourceKind> {
        self.sources.iter().map(|source| source.kind()).collect()
    }

    /// Never fails: unavailable sources simply contribute nothing.
    ///
    /// Filters are carried on the query but do not influence ranking.
    pub async fn aggregate(&self, query: &SearchQuery) -> AggregatedResult {
        let keyword = query.text.trim();
        if keyword.is_empty() {
            return AggregatedResult::default();
        }

        let outcomes = join_all(self.sources.iter().map(|source| async move {
            SourceOutcome::from_result(source.kind(), source.fetch(keyword, query.limit).await)
        }))
        .await;

        let merged: Vec<SourceDocument> = outcomes
            .into_iter()
            .flat_map(SourceOutcome::into_documents)
            .collect();
        let fetched = merged.len();

        let results = rank_by_priority(merged, query.limit.saturating_mul(2));
        debug!(
            query = %keyword,
            fetched,
            returned = results.len(),
            "aggregation finished"
        );

        AggregatedResult::new(results)
    }
}

/// Stable sort by descending source priority, then keep the first `keep`.
pub fn rank_by_priority(mut documents: Vec<SourceDocument>, keep: usize) -> Vec<SourceDocument> {
    documents.sort_by_key(|document| std::cmp::Reverse(document.source.priority()));
    documents.truncate(keep);
    documents
}
