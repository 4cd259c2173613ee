use crate::traits::DocumentSource;
use crate::{SourceDocument, SourceError, SourceKind};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

pub const GLDS_PATTERN: &str = r"(?i)GLDS-|GLDS\d+";

/// GeneLab studies are published through OSDR, so this source re-reads OSDR
/// and keeps only records carrying a `GLDS` accession.
///
/// The same studies also come back from the plain OSDR source. That overlap
/// is kept on purpose: the GENELAB tag marks the curated program and ranks
/// above the raw repository entry.
pub struct GeneLabSource {
    osdr: Arc<dyn DocumentSource>,
    accession: Regex,
}

impl GeneLabSource {
    pub fn new(osdr: Arc<dyn DocumentSource>) -> Result<Self, SourceError> {
        Ok(Self {
            osdr,
            accession: Regex::new(GLDS_PATTERN)?,
        })
    }

    pub fn is_genelab(&self, document: &SourceDocument) -> bool {
        self.accession.is_match(&document.title) || self.accession.is_match(&document.id)
    }
}

#[async_trait]
impl DocumentSource for GeneLabSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Genelab
    }

    async fn fetch(&self, keyword: &str, limit: usize) -> Result<Vec<SourceDocument>, SourceError> {
        let candidates = self.osdr.fetch(keyword, limit.saturating_mul(2)).await?;

        Ok(candidates
            .into_iter()
            .filter(|document| self.is_genelab(document))
            .take(limit)
            .map(retag)
            .collect())
    }
}

/// Marks an OSDR record as GeneLab and moves its id into the `GENELAB-`
/// namespace so it stays unique next to the OSDR copy.
///
/// Only the prefix changes: `GENELAB-<accession>` is always the copy of
/// `OSDR-<accession>`, and every other field is the OSDR record's own.
fn retag(mut document: SourceDocument) -> SourceDocument {
    document.id = match document.id.strip_prefix("OSDR-") {
        Some(rest) => format!("GENELAB-{rest}"),
        None => format!("GENELAB-{}", document.id),
    };
    document.source = SourceKind::Genelab;
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeOsdr {
        documents: Vec<SourceDocument>,
        requested: AtomicUsize,
    }

    #[async_trait]
    impl DocumentSource for FakeOsdr {
        fn kind(&self) -> SourceKind {
            SourceKind::Osdr
        }

        async fn fetch(&self, _keyword: &str, limit: usize) -> Result<Vec<SourceDocument>, SourceError> {
            self.requested.store(limit, Ordering::SeqCst);
            Ok(self.documents.iter().take(limit).cloned().collect())
        }
    }

    struct FailingOsdr;

    #[async_trait]
    impl DocumentSource for FailingOsdr {
        fn kind(&self) -> SourceKind {
            SourceKind::Osdr
        }

        async fn fetch(&self, _keyword: &str, _limit: usize) -> Result<Vec<SourceDocument>, SourceError> {
            Err(SourceError::Status {
                backend: "osdr".to_string(),
                status: 503,
            })
        }
    }

    fn osdr_document(id: &str, title: &str) -> SourceDocument {
        SourceDocument {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            link: "https://osdr.nasa.gov/bio/".to_string(),
            source: SourceKind::Osdr,
            mission: None,
            organism: None,
            assay: None,
            date: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn keeps_only_glds_records_and_retags_them() -> Result<(), SourceError> {
        let osdr = Arc::new(FakeOsdr {
            documents: vec![
                osdr_document("OSDR-OSD-48", "Rodent Research-1"),
                osdr_document("OSDR-GLDS-48", "Rodent Research-1 liver"),
                osdr_document("OSDR-OSD-120", "Study glds242 transcriptome"),
                osdr_document("OSDR-OSD-9", "Glds without digits"),
            ],
            requested: AtomicUsize::new(0),
        });
        let genelab = GeneLabSource::new(osdr.clone())?;

        let documents = genelab.fetch("rodent", 5).await?;
        assert_eq!(osdr.requested.load(Ordering::SeqCst), 10);
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].id, "GENELAB-GLDS-48");
        assert_eq!(documents[1].id, "GENELAB-OSD-120");
        assert!(documents
            .iter()
            .all(|document| document.source == SourceKind::Genelab));
        Ok(())
    }

    #[tokio::test]
    async fn every_copy_points_back_to_its_osdr_record() -> Result<(), SourceError> {
        let candidates = vec![
            osdr_document("OSDR-GLDS-48", "Rodent Research-1 liver"),
            osdr_document("OSDR-OSD-120", "Study GLDS-242 transcriptome"),
            osdr_document("OSDR-OSD-7", "Plant growth"),
        ];
        let osdr = Arc::new(FakeOsdr {
            documents: candidates.clone(),
            requested: AtomicUsize::new(0),
        });
        let genelab = GeneLabSource::new(osdr)?;

        let documents = genelab.fetch("study", 5).await?;
        assert_eq!(documents.len(), 2);
        for copy in &documents {
            let accession = copy.id.strip_prefix("GENELAB-").unwrap_or_default();
            let original = candidates
                .iter()
                .find(|document| document.id == format!("OSDR-{accession}"));
            match original {
                Some(original) => {
                    assert_eq!(copy.title, original.title);
                    assert_eq!(copy.link, original.link);
                }
                None => panic!("{} has no OSDR counterpart", copy.id),
            }
        }
        Ok(())
    }

    #[tokio::test]
    async fn truncates_after_filtering() -> Result<(), SourceError> {
        let osdr = Arc::new(FakeOsdr {
            documents: (1..=6)
                .map(|n| osdr_document(&format!("OSDR-GLDS-{n}"), "study"))
                .collect(),
            requested: AtomicUsize::new(0),
        });
        let genelab = GeneLabSource::new(osdr)?;

        let documents = genelab.fetch("study", 2).await?;
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1].id, "GENELAB-GLDS-2");
        Ok(())
    }

    #[tokio::test]
    async fn osdr_failure_propagates_to_caller() -> Result<(), SourceError> {
        let genelab = GeneLabSource::new(Arc::new(FailingOsdr))?;
        assert!(genelab.fetch("anything", 3).await.is_err());
        Ok(())
    }
}
