use crate::extract::{array_at, first_key};
use crate::http::NasaHttp;
use crate::sources::images::{details_link, image_link, item_metadata, search_images, PLACEHOLDER_TITLE};
use crate::{ArticleItem, ArticlesResponse, SourceError};
use serde_json::Value;

pub const ARTICLES_TOPIC: &str = "space biology";
pub const MAX_ARTICLES: usize = 12;
pub const EXCERPT_CHARS: usize = 220;

/// Feed of article-like cards built from the NASA Images library.
pub struct ArticlesClient {
    http: NasaHttp,
    base_url: String,
}

impl ArticlesClient {
    pub fn new(http: NasaHttp, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Unlike the search sources, failures here surface to the caller.
    pub async fn latest(&self) -> Result<ArticlesResponse, SourceError> {
        let body = search_images(&self.http, &self.base_url, ARTICLES_TOPIC, None).await?;
        Ok(map_articles(&body))
    }
}

pub fn map_articles(body: &Value) -> ArticlesResponse {
    let items = array_at(body, "/collection/items")
        .iter()
        .take(MAX_ARTICLES)
        .enumerate()
        .map(|(position, item)| {
            let meta = item_metadata(item);
            let nasa_id = first_key(meta, &["nasa_id"]);
            let excerpt = first_key(meta, &["description"])
                .map(|text| text.chars().take(EXCERPT_CHARS).collect::<String>())
                .unwrap_or_default();

            ArticleItem {
                id: nasa_id.clone().unwrap_or_else(|| position.to_string()),
                title: first_key(meta, &["title"]).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
                excerpt: Some(excerpt),
                image: image_link(item),
                link: details_link(nasa_id.as_deref()),
                date: first_key(meta, &["date_created"]),
            }
        })
        .collect();

    ArticlesResponse { items }
}
