//! fielddex-sv library - Species classification serving module
//!
//! Wires the FieldDex core (label registry, stability tracker, lookup
//! tables) to an HTTP surface: live classification for camera clients plus
//! reference-data endpoints.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use fielddex_common::{LabelMap, LookupTable, StabilityTracker};

use crate::classifier::ImageClassifier;
use crate::datasets::ReferenceData;

pub mod api;
pub mod classifier;
pub mod config;
pub mod datasets;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Classifier output index → species name
    pub labels: Arc<LabelMap>,
    /// Species reference records, keyed by normalized slug
    pub dex: Arc<LookupTable>,
    /// Competitive-usage statistics, keyed by normalized slug
    pub usage: Arc<LookupTable>,
    /// Per-client prediction stability windows
    pub tracker: Arc<StabilityTracker>,
    /// External model collaborator
    pub classifier: Arc<dyn ImageClassifier>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        data: ReferenceData,
        tracker: Arc<StabilityTracker>,
        classifier: Arc<dyn ImageClassifier>,
    ) -> Self {
        Self {
            labels: Arc::new(data.labels),
            dex: Arc::new(data.dex),
            usage: Arc::new(data.usage),
            tracker,
            classifier,
        }
    }
}

/// Build application router
///
/// Unknown paths fall through to static files under `static_folder`, where
/// sprites and other assets live alongside the datasets. CORS is permissive:
/// the camera page may be hosted separately and client identity is a
/// grouping key, not an authentication concept.
pub fn build_router(state: AppState, static_folder: &Path) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/predict", post(api::predict))
        .route("/api/species/:slug", get(api::get_species))
        .route("/api/usage/:slug", get(api::get_usage))
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes())
        .fallback_service(ServeDir::new(static_folder))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
