use crate::extract::{array_at, first_key, first_match, Extractor};
use crate::http::{endpoint_url, NasaHttp};
use crate::traits::DocumentSource;
use crate::{SourceDocument, SourceError, SourceKind};
use async_trait::async_trait;
use serde_json::Value;

const BACKEND: &str = "images";
pub const IMAGES_HOME: &str = "https://images.nasa.gov/";
const DETAILS_BASE: &str = "https://images.nasa.gov/details-";
pub(crate) const PLACEHOLDER_TITLE: &str = "NASA Image";

const MISSION_HINTS: &[&str] = &["mission"];
const ORGANISM_HINTS: &[&str] = &["biology", "organism", "life"];

const IMAGE: &[Extractor] = &[preview_link, rendered_image_link];

/// Image search over the NASA Image and Video Library.
pub struct ImagesSource {
    http: NasaHttp,
    base_url: String,
}

impl ImagesSource {
    pub fn new(http: NasaHttp, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DocumentSource for ImagesSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Images
    }

    async fn fetch(&self, keyword: &str, limit: usize) -> Result<Vec<SourceDocument>, SourceError> {
        let body = search_images(&self.http, &self.base_url, keyword, Some(limit)).await?;
        Ok(map_images_response(&body, limit))
    }
}

/// Raw Images search, shared with the articles feed.
pub(crate) async fn search_images(
    http: &NasaHttp,
    base_url: &str,
    keyword: &str,
    page_size: Option<usize>,
) -> Result<Value, SourceError> {
    let page_size = page_size.map(|size| size.to_string());
    let mut params = vec![("q", keyword), ("media_type", "image")];
    if let Some(size) = page_size.as_deref() {
        params.push(("page_size", size));
    }
    let url = endpoint_url(base_url, "search", &params)?;
    http.get_json(BACKEND, url).await
}

pub fn map_images_response(body: &Value, limit: usize) -> Vec<SourceDocument> {
    array_at(body, "/collection/items")
        .iter()
        .take(limit)
        .enumerate()
        .map(|(position, item)| map_image_item(item, position))
        .collect()
}

fn map_image_item(item: &Value, position: usize) -> SourceDocument {
    let meta = item_metadata(item);
    let nasa_id = first_key(meta, &["nasa_id"]);
    let keywords = keyword_list(meta);

    SourceDocument {
        id: match &nasa_id {
            Some(nasa_id) => format!("IMAGES-{nasa_id}"),
            None => format!("IMAGES-{position}"),
        },
        title: first_key(meta, &["title"]).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
        description: first_key(meta, &["description"]),
        link: details_link(nasa_id.as_deref()),
        source: SourceKind::Images,
        mission: find_keyword(&keywords, MISSION_HINTS),
        organism: find_keyword(&keywords, ORGANISM_HINTS),
        assay: None,
        date: first_key(meta, &["date_created"]),
        image: image_link(item),
    }
}

pub(crate) fn item_metadata(item: &Value) -> &Value {
    item.pointer("/data/0").unwrap_or(&Value::Null)
}

pub(crate) fn details_link(nasa_id: Option<&str>) -> String {
    match nasa_id {
        Some(nasa_id) => format!("{DETAILS_BASE}{nasa_id}"),
        None => IMAGES_HOME.to_string(),
    }
}

pub(crate) fn image_link(item: &Value) -> Option<String> {
    first_match(item, IMAGE)
}

fn preview_link(item: &Value) -> Option<String> {
    link_where(item, "rel", "preview")
}

fn rendered_image_link(item: &Value) -> Option<String> {
    link_where(item, "render", "image")
}

fn link_where(item: &Value, key: &str, expected: &str) -> Option<String> {
    array_at(item, "/links")
        .iter()
        .find(|link| link.get(key).and_then(Value::as_str) == Some(expected))
        .and_then(|link| first_key(link, &["href"]))
}

fn keyword_list(meta: &Value) -> Vec<&str> {
    array_at(meta, "/keywords")
        .iter()
        .filter_map(Value::as_str)
        .collect()
}

/// First keyword containing any hint, case-insensitively.
fn find_keyword(keywords: &[&str], hints: &[&str]) -> Option<String> {
    keywords
        .iter()
        .find(|keyword| {
            let lowered = keyword.to_lowercase();
            hints.iter().any(|hint| lowered.contains(hint))
        })
        .map(|keyword| keyword.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item() -> Value {
        json!({
            "data": [{
                "nasa_id": "iss038e012345",
                "title": "Rodent habitat on ISS",
                "description": "Mice aboard the station",
                "date_created": "2014-01-05T00:00:00Z",
                "keywords": ["ISS", "Rodent Research Mission", "Space Biology"]
            }],
            "links": [
                {"href": "https://images-assets.nasa.gov/image/iss038e012345/thumb.jpg", "rel": "preview", "render": "image"}
            ]
        })
    }

    #[test]
    fn maps_image_item() {
        let body = json!({"collection": {"items": [sample_item()]}});
        let documents = map_images_response(&body, 10);
        let document = &documents[0];

        assert_eq!(document.id, "IMAGES-iss038e012345");
        assert_eq!(document.title, "Rodent habitat on ISS");
        assert_eq!(document.link, "https://images.nasa.gov/details-iss038e012345");
        assert_eq!(document.mission.as_deref(), Some("Rodent Research Mission"));
        assert_eq!(document.organism.as_deref(), Some("Space Biology"));
        assert_eq!(document.date.as_deref(), Some("2014-01-05T00:00:00Z"));
        assert_eq!(
            document.image.as_deref(),
            Some("https://images-assets.nasa.gov/image/iss038e012345/thumb.jpg")
        );
        assert_eq!(document.source, SourceKind::Images);
    }

    #[test]
    fn rendered_image_is_used_without_preview() {
        let item = json!({"links": [
            {"href": "https://a.example/captions.srt", "rel": "captions"},
            {"href": "https://a.example/full.jpg", "render": "image"}
        ]});
        assert_eq!(image_link(&item).as_deref(), Some("https://a.example/full.jpg"));
    }

    #[test]
    fn bare_items_get_placeholders() {
        let body = json!({"collection": {"items": [{}, {"data": []}]}});
        let documents = map_images_response(&body, 10);

        assert_eq!(documents[0].id, "IMAGES-0");
        assert_eq!(documents[1].id, "IMAGES-1");
        assert_eq!(documents[0].title, PLACEHOLDER_TITLE);
        assert_eq!(documents[0].link, IMAGES_HOME);
        assert!(documents[0].image.is_none());
        assert!(documents[0].mission.is_none());
    }

    #[test]
    fn keyword_hints_are_case_insensitive() {
        let keywords = ["Earth", "LIFE SCIENCES"];
        assert_eq!(
            find_keyword(&keywords, ORGANISM_HINTS).as_deref(),
            Some("LIFE SCIENCES")
        );
        assert_eq!(find_keyword(&keywords, MISSION_HINTS), None);
    }

    #[test]
    fn truncates_to_limit() {
        let body = json!({"collection": {"items": [sample_item(), sample_item(), sample_item()]}});
        assert_eq!(map_images_response(&body, 2).len(), 2);
    }
}
