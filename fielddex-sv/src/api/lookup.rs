//! Reference data endpoints (dex records, competitive usage)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use fielddex_common::normalize_key;

use crate::AppState;

/// GET /api/species/:slug
///
/// Returns the dex record for a species, 404 when unknown. The slug is
/// normalized before lookup, so any of the dataset's historical spellings
/// resolve to the same record.
pub async fn get_species(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.dex.get(&slug) {
        Some(record) => Json(record.clone()).into_response(),
        None => {
            warn!(slug = %slug, normalized = %normalize_key(&slug), "dex lookup miss");
            (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response()
        }
    }
}

/// GET /api/usage/:slug
///
/// Returns competitive-usage statistics for a species. A miss is an
/// expected outcome and answers 200 with an empty object; the gap is logged
/// for observability.
pub async fn get_usage(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Json<serde_json::Value> {
    match state.usage.get(&slug) {
        Some(record) => Json(record.clone()),
        None => {
            warn!(slug = %slug, normalized = %normalize_key(&slug), "usage lookup miss");
            Json(json!({}))
        }
    }
}
