use crate::extract::{first_key, first_match, Extractor};
use crate::http::{endpoint_url, NasaHttp};
use crate::traits::DocumentSource;
use crate::{SourceDocument, SourceError, SourceKind};
use async_trait::async_trait;
use serde_json::Value;

const BACKEND: &str = "osdr";
pub const OSDR_HOME: &str = "https://osdr.nasa.gov/bio/";
const STUDY_BASE: &str = "https://osdr.nasa.gov/bio/repo/data/studies/";

const ACCESSION: &[Extractor] = &[
    |record| first_key(record, &["Dataset_Accession"]),
    |record| first_key(record, &["DatasetAccession"]),
    |record| first_key(record, &["Accession"]),
];

const TITLE: &[Extractor] = &[
    |record| first_key(record, &["Title"]),
    |record| first_key(record, &["title"]),
    |record| first_key(record, &["Dataset_Title"]),
];

const MISSION: &[Extractor] = &[
    |record| first_key(record, &["Mission"]),
    |record| first_key(record, &["mission"]),
    |record| first_key(record, &["Study_Mission"]),
];

const ORGANISM: &[Extractor] = &[
    |record| first_key(record, &["Organism"]),
    |record| first_key(record, &["organism"]),
    |record| first_key(record, &["Species"]),
];

const ASSAY: &[Extractor] = &[
    |record| first_key(record, &["Assay"]),
    |record| first_key(record, &["assay"]),
    |record| first_key(record, &["Assay_Type"]),
];

const DESCRIPTION: &[Extractor] = &[
    |record| first_key(record, &["Description"]),
    |record| first_key(record, &["summary"]),
];

const DATE: &[Extractor] = &[
    |record| first_key(record, &["Release_Date"]),
    |record| first_key(record, &["date"]),
];

/// Keyword search over the OSDR biological metadata API.
pub struct OsdrSource {
    http: NasaHttp,
    base_url: String,
}

impl OsdrSource {
    pub fn new(http: NasaHttp, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DocumentSource for OsdrSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Osdr
    }

    async fn fetch(&self, keyword: &str, limit: usize) -> Result<Vec<SourceDocument>, SourceError> {
        let url = endpoint_url(
            &self.base_url,
            "v2/query/metadata/",
            &[("keyword", keyword), ("format", "json")],
        )?;
        let body = self.http.get_json(BACKEND, url).await?;
        map_osdr_response(&body, limit)
    }
}

/// OSDR answers with a bare array of study records; anything else is treated
/// as an unusable response.
pub fn map_osdr_response(body: &Value, limit: usize) -> Result<Vec<SourceDocument>, SourceError> {
    let records = body.as_array().ok_or_else(|| SourceError::BackendResponse {
        backend: BACKEND.to_string(),
        details: "expected a JSON array of records".to_string(),
    })?;

    Ok(records
        .iter()
        .take(limit)
        .enumerate()
        .map(|(position, record)| map_osdr_record(record, position))
        .collect())
}

fn map_osdr_record(record: &Value, position: usize) -> SourceDocument {
    let accession = first_match(record, ACCESSION);

    let title = first_match(record, TITLE).unwrap_or_else(|| match &accession {
        Some(accession) => format!("OSDR Record {accession}"),
        None => format!("OSDR Record {}", position + 1),
    });
    let link = accession
        .as_ref()
        .map(|accession| format!("{STUDY_BASE}{accession}"))
        .unwrap_or_else(|| OSDR_HOME.to_string());
    let id = match &accession {
        Some(accession) => format!("OSDR-{accession}"),
        None => format!("OSDR-{position}"),
    };

    SourceDocument {
        id,
        title,
        description: first_match(record, DESCRIPTION),
        link,
        source: SourceKind::Osdr,
        mission: first_match(record, MISSION),
        organism: first_match(record, ORGANISM),
        assay: first_match(record, ASSAY),
        date: first_match(record, DATE),
        image: None,
    }
}
