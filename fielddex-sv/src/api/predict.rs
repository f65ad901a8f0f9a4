//! Live classification endpoint
//!
//! Accepts a camera frame, runs the external classifier, resolves the label,
//! and folds the observation into the caller's stability window so the UI
//! only reacts once the prediction has settled.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::decode_frame;
use crate::error::ApiError;
use crate::AppState;

/// Header carrying the caller-supplied grouping key
const CLIENT_ID_HEADER: &str = "x-client-id";

/// Fallback grouping key when neither header nor peer address is available
const ANON_CLIENT: &str = "anon";

/// Request body for POST /api/predict
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Base64-encoded camera frame, with or without a data-URL prefix
    #[serde(default)]
    pub image: Option<String>,
}

/// Response body for POST /api/predict
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Resolved species name (fallback token for unknown class indices)
    pub name: String,
    /// Raw top confidence, rounded to 4 decimals
    pub conf: f64,
    /// Debounced stability flag for this caller
    pub stable: bool,
}

/// POST /api/predict
pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let image = body
        .image
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing image".to_string()))?;

    let input = decode_frame(image).map_err(|e| ApiError::Internal(e.to_string()))?;

    let probs = state
        .classifier
        .classify(&input)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let (index, confidence) = top_prediction(&probs)
        .ok_or_else(|| ApiError::Internal("empty probability distribution".to_string()))?;

    let name = state.labels.resolve(index);
    let client_id = client_identity(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let stable = state.tracker.observe(&client_id, index, confidence);
    debug!(client = %client_id, label = %name, confidence, stable, "classified frame");

    Ok(Json(PredictResponse {
        name: name.to_string(),
        conf: round4(confidence),
        stable,
    }))
}

/// Resolve the caller's grouping key: header, then peer address, then a
/// shared fallback. Purely a grouping key; never authenticated.
fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(id) = headers.get(CLIENT_ID_HEADER).and_then(|v| v.to_str().ok()) {
        if !id.is_empty() {
            return id.to_string();
        }
    }
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| ANON_CLIENT.to_string())
}

/// Index and confidence of the most probable class. Ties resolve to the
/// lowest index.
fn top_prediction(probs: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &p) in probs.iter().enumerate() {
        match best {
            Some((_, best_p)) if p <= best_p => {}
            _ => best = Some((index, p)),
        }
    }
    best
}

/// Round a confidence to 4 decimal places for the wire. The raw value is
/// rounded, never re-derived.
fn round4(confidence: f32) -> f64 {
    (f64::from(confidence) * 10_000.0).round() / 10_000.0
}
