use crate::extract::{array_at, first_key, first_match, first_pointer, Extractor};
use crate::http::{endpoint_url, NasaHttp};
use crate::traits::DocumentSource;
use crate::{SourceDocument, SourceError, SourceKind};
use async_trait::async_trait;
use serde_json::Value;

const BACKEND: &str = "cmr";
pub const CMR_HOME: &str = "https://cmr.earthdata.nasa.gov/search/";
const CONCEPT_BASE: &str = "https://cmr.earthdata.nasa.gov/search/concepts/";
const PLACEHOLDER_TITLE: &str = "CMR Collection";

const TITLE: &[Extractor] = &[
    |entry| first_key(entry, &["dataset_id"]),
    |entry| first_key(entry, &["short_name"]),
    |entry| first_key(entry, &["title"]),
];

const DESCRIPTION: &[Extractor] = &[
    |entry| first_key(entry, &["summary"]),
    |entry| first_key(entry, &["description"]),
];

const LINK: &[Extractor] = &[metadata_link, first_link, concept_link];

/// Collection search over NASA's Common Metadata Repository.
pub struct CmrSource {
    http: NasaHttp,
    base_url: String,
}

impl CmrSource {
    pub fn new(http: NasaHttp, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DocumentSource for CmrSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Cmr
    }

    async fn fetch(&self, keyword: &str, limit: usize) -> Result<Vec<SourceDocument>, SourceError> {
        let page_size = limit.to_string();
        let url = endpoint_url(
            &self.base_url,
            "search/collections.json",
            &[("keyword", keyword), ("page_size", &page_size)],
        )?;
        let body = self.http.get_json(BACKEND, url).await?;
        Ok(map_cmr_response(&body, limit))
    }
}

/// Maps the `feed.entry` array of a CMR collections response.
pub fn map_cmr_response(body: &Value, limit: usize) -> Vec<SourceDocument> {
    array_at(body, "/feed/entry")
        .iter()
        .take(limit)
        .map(map_cmr_entry)
        .collect()
}

fn map_cmr_entry(entry: &Value) -> SourceDocument {
    let title = first_match(entry, TITLE).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());
    let id = match first_key(entry, &["id"]) {
        Some(id) => format!("CMR-{id}"),
        None => format!("CMR-{title}"),
    };

    SourceDocument {
        id,
        description: first_match(entry, DESCRIPTION),
        link: first_match(entry, LINK).unwrap_or_else(|| CMR_HOME.to_string()),
        source: SourceKind::Cmr,
        mission: first_pointer(entry, &["/projects/0/short_name"]),
        organism: None,
        assay: None,
        date: first_key(entry, &["time_start"]),
        image: None,
        title,
    }
}

fn metadata_link(entry: &Value) -> Option<String> {
    array_at(entry, "/links")
        .iter()
        .find(|link| {
            link.get("rel")
                .and_then(Value::as_str)
                .is_some_and(|rel| rel.contains("/search/metadata"))
        })
        .and_then(|link| first_key(link, &["href"]))
}

fn first_link(entry: &Value) -> Option<String> {
    array_at(entry, "/links")
        .first()
        .and_then(|link| first_key(link, &["href"]))
}

fn concept_link(entry: &Value) -> Option<String> {
    first_key(entry, &["id"]).map(|id| format!("{CONCEPT_BASE}{id}.html"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_collection_entry() {
        let body = json!({"feed": {"entry": [{
            "id": "C1234-NASA",
            "dataset_id": "Plant growth radiation dataset",
            "summary": "Radiation exposure of plants",
            "time_start": "2012-01-01T00:00:00.000Z",
            "projects": [{"short_name": "ISS"}],
            "links": [
                {"rel": "http://esipfed.org/ns/fedsearch/1.1/data#", "href": "https://data.example/raw"},
                {"rel": "http://esipfed.org/ns/fedsearch/1.1/search/metadata#", "href": "https://data.example/meta"}
            ]
        }]}});

        let documents = map_cmr_response(&body, 10);
        assert_eq!(documents.len(), 1);
        let document = &documents[0];
        assert_eq!(document.id, "CMR-C1234-NASA");
        assert_eq!(document.title, "Plant growth radiation dataset");
        assert_eq!(document.link, "https://data.example/meta");
        assert_eq!(document.mission.as_deref(), Some("ISS"));
        assert_eq!(document.date.as_deref(), Some("2012-01-01T00:00:00.000Z"));
        assert!(document.organism.is_none());
        assert!(document.assay.is_none());
    }

    #[test]
    fn link_prefers_metadata_then_first_then_concept() {
        let first_only = json!({"links": [{"rel": "data", "href": "https://data.example/a"}]});
        assert_eq!(
            first_match(&first_only, LINK).as_deref(),
            Some("https://data.example/a")
        );

        let no_links = json!({"id": "C99-NASA"});
        assert_eq!(
            first_match(&no_links, LINK).as_deref(),
            Some("https://cmr.earthdata.nasa.gov/search/concepts/C99-NASA.html")
        );

        let empty_links = json!({"links": []});
        let document = map_cmr_entry(&empty_links);
        assert_eq!(document.link, CMR_HOME);
    }

    #[test]
    fn title_falls_back_and_drives_id() {
        let body = json!({"feed": {"entry": [{"short_name": "RADLAB_DOSE"}, {}]}});
        let documents = map_cmr_response(&body, 10);
        assert_eq!(documents[0].title, "RADLAB_DOSE");
        assert_eq!(documents[0].id, "CMR-RADLAB_DOSE");
        assert_eq!(documents[1].title, "CMR Collection");
        assert_eq!(documents[1].id, "CMR-CMR Collection");
        assert_eq!(documents[1].description, None);
    }

    #[test]
    fn unexpected_shape_yields_nothing() {
        assert!(map_cmr_response(&json!({"errors": ["bad keyword"]}), 10).is_empty());
        assert!(map_cmr_response(&json!([1, 2, 3]), 10).is_empty());
    }

    #[test]
    fn truncates_to_limit() {
        let entries: Vec<Value> = (0..5).map(|n| json!({"id": format!("C{n}")})).collect();
        let body = json!({"feed": {"entry": entries}});
        assert_eq!(map_cmr_response(&body, 3).len(), 3);
    }
}
