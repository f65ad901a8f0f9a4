//! HTTP error responses for fielddex-sv

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Handler-level errors, rendered as `{"error": message}` JSON bodies
#[derive(Debug)]
pub enum ApiError {
    /// Request is malformed (e.g. missing image payload)
    BadRequest(String),
    /// Classification pipeline failure (decode, preprocessing, model service)
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
