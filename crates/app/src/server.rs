//! HTTP surface over the aggregation core.
//!
//! | Method      | Path            | Body / params                         |
//! |-------------|-----------------|---------------------------------------|
//! | `GET, POST` | `/api/search`   | `query`, `filters`, `limit`           |
//! | `GET, POST` | `/api/chat`     | `query` (or `q`), `filters`           |
//! | `GET`       | `/api/articles` | none                                  |
//! | `GET`       | `/api/ping`     | none                                  |
//!
//! Errors are returned as `{ "error": "<message>" }`, including rejected
//! query strings and bodies.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use space_bio_core::{
    normalize_query, AggregatedResult, Aggregator, ArticlesClient, ArticlesResponse, ChatAnswer,
    ChatResponder, SearchFilters, SearchQuery,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub chat: Arc<ChatResponder>,
    pub articles: Arc<ArticlesClient>,
    pub ping_message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    fn missing_query() -> Self {
        Self::bad_request("Missing query")
    }

    fn invalid_query_string(rejection: QueryRejection) -> Self {
        warn!(%rejection, "rejected query string");
        Self::bad_request("Invalid query string")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/search", get(search_get).post(search_post))
        .route("/api/chat", get(chat_get).post(chat_post))
        .route("/api/articles", get(articles))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(bind_addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        message: state.ping_message.clone(),
    })
}

pub async fn search_get(
    State(state): State<AppState>,
    params: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Json<AggregatedResult>, ApiError> {
    let Query(request) = params.map_err(ApiError::invalid_query_string)?;
    run_search(state, request).await
}

pub async fn search_post(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<AggregatedResult>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        warn!(%rejection, "rejected search body");
        ApiError::bad_request("Invalid request body")
    })?;
    run_search(state, request).await
}

async fn run_search(
    state: AppState,
    request: SearchRequest,
) -> Result<Json<AggregatedResult>, ApiError> {
    let query = SearchQuery::from_input(
        request.query.as_deref().unwrap_or_default(),
        request.filters,
        request.limit,
    )
    .ok_or_else(ApiError::missing_query)?;

    let aggregator = state.aggregator.clone();
    let result = tokio::spawn(async move { aggregator.aggregate(&query).await })
        .await
        .map_err(|join_error| {
            error!(%join_error, "/api/search failed");
            ApiError::internal("Search failed")
        })?;

    Ok(Json(result))
}

pub async fn chat_get(
    State(state): State<AppState>,
    params: Result<Query<ChatRequest>, QueryRejection>,
) -> Result<Json<ChatAnswer>, ApiError> {
    let Query(request) = params.map_err(ApiError::invalid_query_string)?;
    run_chat(state, request).await
}

pub async fn chat_post(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatAnswer>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        warn!(%rejection, "rejected chat body");
        ApiError::bad_request("Invalid request body")
    })?;
    run_chat(state, request).await
}

async fn run_chat(state: AppState, request: ChatRequest) -> Result<Json<ChatAnswer>, ApiError> {
    let question = normalize_query(request.query.or(request.q).as_deref().unwrap_or_default());
    if question.is_empty() {
        return Err(ApiError::missing_query());
    }
    let filters = request.filters.unwrap_or_default();

    let chat = state.chat.clone();
    let answer = tokio::spawn(async move { chat.answer(&question, filters).await })
        .await
        .map_err(|join_error| {
            error!(%join_error, "/api/chat failed");
            ApiError::internal("Chat failed")
        })?;

    Ok(Json(answer))
}

pub async fn articles(State(state): State<AppState>) -> Result<Json<ArticlesResponse>, ApiError> {
    state.articles.latest().await.map(Json).map_err(|source_error| {
        error!(%source_error, "/api/articles failed");
        ApiError::internal("Failed to fetch articles")
    })
}
