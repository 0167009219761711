//! HTTP boundary: search, health and image passthrough routes

use axum::{
    extract::{Json, Query, State},
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::SearchResponse;
use crate::engine::RecipeEngine;
use crate::error::RecipeEngineError;
use crate::proxy::{rewrite_image_url, ImageFetcher};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecipeEngine>,
    pub fetcher: Arc<dyn ImageFetcher>,
    /// Prefix for rewritten image URLs, e.g. `https://host/img?url=`
    pub image_prefix: String,
}

impl AppState {
    pub fn new(engine: Arc<RecipeEngine>, fetcher: Arc<dyn ImageFetcher>, image_prefix: impl Into<String>) -> Self {
        Self {
            engine,
            fetcher,
            image_prefix: image_prefix.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageParams {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub total_recipes: usize,
    pub recipes_with_rating: usize,
    pub scoring_policy: String,
    pub loaded_at: DateTime<Utc>,
    pub version: String,
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/recipes", get(search_handler))
        .route("/health", get(health_handler))
        .route("/img", get(image_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params
        .query
        .filter(|q| !q.is_empty())
        .ok_or_else(|| RecipeEngineError::InvalidRequest("Missing query parameter".to_string()))?;

    // Scanning the catalog is CPU-bound
    let engine = state.engine.clone();
    let response = tokio::task::spawn_blocking(move || engine.search(&query))
        .await
        .map_err(|e| RecipeEngineError::Other(format!("Search task failed: {}", e)))?;

    let response = response.map_images(|src| rewrite_image_url(&state.image_prefix, src));
    tracing::info!("✅ {}", response.display());

    Ok(Json(response))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.engine.stats();

    Json(HealthResponse {
        status: "healthy".to_string(),
        total_recipes: stats.total_recipes,
        recipes_with_rating: stats.recipes_with_rating,
        scoring_policy: state.engine.policy_name().to_string(),
        loaded_at: state.engine.catalog().loaded_at(),
        version: crate::VERSION.to_string(),
    })
}

async fn image_handler(
    State(state): State<AppState>,
    Query(params): Query<ImageParams>,
) -> Result<Response, AppError> {
    let url = params
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| RecipeEngineError::InvalidRequest("Missing 'url' query parameter".to_string()))?;

    tracing::debug!("🖼️ Proxying image via {} fetcher: {}", state.fetcher.name(), url);
    let image = state.fetcher.fetch(&url).await?;

    let mut response = (StatusCode::OK, image.bytes).into_response();
    if let Some(value) = image.content_type.as_deref().and_then(|ct| HeaderValue::from_str(ct).ok()) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    Ok(response)
}

// Error handling
pub struct AppError(RecipeEngineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            RecipeEngineError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message),
            e @ (RecipeEngineError::Upstream { .. } | RecipeEngineError::HttpRequest(_)) => {
                tracing::warn!("Image fetch failed: {}", e);
                (StatusCode::BAD_GATEWAY, "Failed to fetch image".to_string())
            }
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::error!("❌ Error: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<RecipeEngineError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
