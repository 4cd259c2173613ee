use crate::{FallbackError, SourceDocument, SourceError, SourceKind};
use async_trait::async_trait;

/// One upstream catalogue that can be searched by keyword.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Fetches at most `limit` normalized documents for `keyword`.
    async fn fetch(&self, keyword: &str, limit: usize) -> Result<Vec<SourceDocument>, SourceError>;
}

/// Free-text generator used when no NASA records match a chat query.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, question: &str) -> Result<String, FallbackError>;
}
