//! Axum handlers for the recommendation endpoints.
//!
//! Each handler is a thin mapping from path/query parameters to one engine
//! query. Engine errors and malformed parameters become JSON
//! `{"detail": ...}` bodies.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ApiState;
use crate::constants::{DEFAULT_RECOMMEND_K, DEFAULT_SEARCH_K, DEFAULT_SIMILAR_K};
use crate::error::RecError;
use crate::product::{Product, ProductId, UserId};

// ── Request / response types ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct KParams {
    k: Option<usize>,
}

#[derive(Deserialize)]
pub(super) struct SearchParams {
    q: String,
    k: Option<usize>,
}

#[derive(Serialize)]
pub(super) struct Items {
    items: Vec<Product>,
}

// ── Errors ────────────────────────────────────────────────────────────────────

pub(super) enum ApiError {
    Engine(RecError),
    /// Id outside the product id range.
    NoSuchProduct,
    /// Bad path segment or query string.
    InvalidRequest(String),
}

impl From<RecError> for ApiError {
    fn from(e: RecError) -> Self {
        Self::Engine(e)
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        Self::InvalidRequest(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::InvalidRequest(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Engine(RecError::CatalogUnavailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, "no product data".to_string())
            }
            Self::Engine(RecError::ProductNotFound(_)) | Self::NoSuchProduct => {
                (StatusCode::NOT_FOUND, "product not found".to_string())
            }
            Self::Engine(e) => {
                tracing::error!(error = %e, "Engine query failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            Self::InvalidRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

type PathParam<T> = Result<Path<T>, PathRejection>;
type QueryParams<T> = Result<Query<T>, QueryRejection>;

/// Product ids outside the id type's range (negative, too large) name no
/// product. The catalog must still be present so 503 wins over 404.
fn product_id(state: &ApiState, raw: i64) -> Result<Option<ProductId>, ApiError> {
    if state.engine.status().catalog_products.is_none() {
        return Err(RecError::CatalogUnavailable.into());
    }
    Ok(ProductId::try_from(raw).ok())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /health
pub(super) async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "artifacts": state.engine.status() }))
}

/// GET /products/{id}
pub(super) async fn get_product(
    State(state): State<ApiState>,
    path: PathParam<i64>,
) -> Result<Json<Product>, ApiError> {
    let Path(raw) = path?;
    let Some(pid) = product_id(&state, raw)? else {
        return Err(ApiError::NoSuchProduct);
    };
    Ok(Json(state.engine.get_product(pid)?))
}

/// GET /recommend/user/{id}?k=
pub(super) async fn recommend_user(
    State(state): State<ApiState>,
    path: PathParam<UserId>,
    query: QueryParams<KParams>,
) -> Result<Json<Items>, ApiError> {
    let Path(user_id) = path?;
    let Query(params) = query?;
    let k = params.k.unwrap_or(DEFAULT_RECOMMEND_K);
    let items = state.engine.recommend_for_user(user_id, k)?;
    Ok(Json(Items { items }))
}

/// GET /recommend/similar/{id}?k=
pub(super) async fn recommend_similar(
    State(state): State<ApiState>,
    path: PathParam<i64>,
    query: QueryParams<KParams>,
) -> Result<Json<Items>, ApiError> {
    let Path(raw) = path?;
    let Query(params) = query?;
    let Some(pid) = product_id(&state, raw)? else {
        return Ok(Json(Items { items: Vec::new() }));
    };
    let k = params.k.unwrap_or(DEFAULT_SIMILAR_K);
    let items = state.engine.similar_items(pid, k)?;
    Ok(Json(Items { items }))
}

/// GET /search?q=&k=
pub(super) async fn search(
    State(state): State<ApiState>,
    query: QueryParams<SearchParams>,
) -> Result<Json<Items>, ApiError> {
    let Query(params) = query?;
    if params.q.is_empty() {
        return Err(ApiError::InvalidRequest("q must not be empty".to_string()));
    }
    let k = params.k.unwrap_or(DEFAULT_SEARCH_K);
    let items = state.engine.search_products(&params.q, k)?;
    Ok(Json(Items { items }))
}
