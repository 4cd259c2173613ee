pub mod aggregator;
pub mod articles;
pub mod chat;
pub mod config;
pub mod error;
pub mod extract;
pub mod gemini;
pub mod http;
pub mod models;
pub mod sources;
pub mod traits;

pub use aggregator::{rank_by_priority, Aggregator, SourceOutcome};
pub use articles::ArticlesClient;
pub use chat::{fallback_answer, nasa_answer, ChatResponder};
pub use config::{GeminiConfig, NasaEndpoints};
pub use error::{FallbackError, SourceError};
pub use gemini::GeminiClient;
pub use http::{NasaHttp, USER_AGENT};
pub use models::{
    normalize_query, resolve_limit, AggregatedResult, ArticleItem, ArticlesResponse, ChatAnswer,
    Citation, SearchFilters, SearchQuery, SourceDocument, SourceKind, DEFAULT_LIMIT,
    MAX_QUERY_CHARS,
};
pub use sources::{CmrSource, GeneLabSource, ImagesSource, OsdrSource};
pub use traits::{DocumentSource, TextGenerator};
