//! Integration tests for fielddex-sv API endpoints
//!
//! Exercises the full router with a fixed-output classifier standing in for
//! the external model service: classification + stability flow, reference
//! lookups, and error shapes.

use std::io::Cursor;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::Engine;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use fielddex_common::{LabelMap, LookupTable, Result, StabilityTracker};
use fielddex_sv::classifier::ImageClassifier;
use fielddex_sv::datasets::ReferenceData;
use fielddex_sv::{build_router, AppState};

/// Classifier double that always answers the same distribution
struct FixedClassifier {
    probs: Vec<f32>,
}

#[async_trait::async_trait]
impl ImageClassifier for FixedClassifier {
    async fn classify(&self, _input: &[f32]) -> Result<Vec<f32>> {
        Ok(self.probs.clone())
    }
}

/// Test helper: build an app whose classifier always answers `probs`
fn setup_app(probs: Vec<f32>) -> (axum::Router, tempfile::TempDir) {
    let data = ReferenceData {
        labels: LabelMap::from_value(&json!({"0": "bulbasaur", "5": "haunter"})).unwrap(),
        dex: LookupTable::from_value(json!({
            "Mr.Mime": {"num": 122, "types": ["psychic", "fairy"]},
            "haunter": {"num": 93, "types": ["ghost", "poison"]},
        }))
        .unwrap(),
        usage: LookupTable::from_value(json!({
            "Haunter": {"usage": 0.0123},
        }))
        .unwrap(),
    };

    let state = AppState::new(
        data,
        Arc::new(StabilityTracker::new()),
        Arc::new(FixedClassifier { probs }),
    );

    // Static fallback needs some folder to serve from
    let static_dir = tempfile::TempDir::new().unwrap();
    let app = build_router(state, static_dir.path());
    (app, static_dir)
}

/// Test helper: a tiny JPEG frame as a browser-style data URL
fn frame_data_url() -> String {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        16,
        16,
        image::Rgb([120, 80, 40]),
    ));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .unwrap();
    format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Test helper: POST /api/predict with an optional client id header
fn predict_request(client_id: Option<&str>, image: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header("content-type", "application/json");
    if let Some(id) = client_id {
        builder = builder.header("x-client-id", id);
    }
    let body = match image {
        Some(image) => json!({ "image": image }),
        None => json!({}),
    };
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Test helper: extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _static_dir) = setup_app(vec![1.0]);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "fielddex-sv");
    assert!(body["version"].is_string());
}

// =============================================================================
// Classification + Stability
// =============================================================================

#[tokio::test]
async fn test_predict_resolves_name_and_rounds_confidence() {
    // Class 5 wins with an awkwardly precise confidence
    let (app, _static_dir) = setup_app(vec![0.01, 0.0, 0.0, 0.0, 0.0, 0.876_543_2]);

    let response = app
        .oneshot(predict_request(Some("cam-1"), Some(&frame_data_url())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "haunter");
    assert_eq!(body["conf"], 0.8765);
    assert_eq!(body["stable"], false);
}

#[tokio::test]
async fn test_predict_becomes_stable_on_third_frame() {
    let (app, _static_dir) = setup_app(vec![0.05, 0.0, 0.0, 0.0, 0.0, 0.9]);
    let frame = frame_data_url();

    for expected_stable in [false, false, true] {
        let response = app
            .clone()
            .oneshot(predict_request(Some("cam-1"), Some(&frame)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        assert_eq!(body["stable"], expected_stable);
    }
}

#[tokio::test]
async fn test_predict_clients_are_isolated() {
    let (app, _static_dir) = setup_app(vec![0.05, 0.0, 0.0, 0.0, 0.0, 0.9]);
    let frame = frame_data_url();

    // cam-a gets two frames in
    for _ in 0..2 {
        app.clone()
            .oneshot(predict_request(Some("cam-a"), Some(&frame)))
            .await
            .unwrap();
    }

    // cam-b's first frame must not inherit cam-a's progress
    let response = app
        .clone()
        .oneshot(predict_request(Some("cam-b"), Some(&frame)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["stable"], false);

    // while cam-a's third frame completes its own window
    let response = app
        .oneshot(predict_request(Some("cam-a"), Some(&frame)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["stable"], true);
}

#[tokio::test]
async fn test_predict_unknown_class_index_uses_fallback_name() {
    // Argmax lands on index 3, which the label map does not know
    let (app, _static_dir) = setup_app(vec![0.1, 0.0, 0.0, 0.8]);

    let response = app
        .oneshot(predict_request(Some("cam-1"), Some(&frame_data_url())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Unknown");
}

#[tokio::test]
async fn test_predict_missing_image_is_bad_request() {
    let (app, _static_dir) = setup_app(vec![1.0]);

    let response = app
        .oneshot(predict_request(Some("cam-1"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "missing image");
}

#[tokio::test]
async fn test_predict_undecodable_image_is_server_error() {
    let (app, _static_dir) = setup_app(vec![1.0]);

    let response = app
        .oneshot(predict_request(Some("cam-1"), Some("definitely-not-base64!!!")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].is_string());
}

// =============================================================================
// Reference Lookups
// =============================================================================

#[tokio::test]
async fn test_species_lookup_joins_across_key_formats() {
    let (app, _static_dir) = setup_app(vec![1.0]);

    // Dataset key is "Mr.Mime"; query uses a different convention
    let request = Request::builder()
        .method("GET")
        .uri("/api/species/mr-mime")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["num"], 122);
}

#[tokio::test]
async fn test_species_miss_is_not_found() {
    let (app, _static_dir) = setup_app(vec![1.0]);

    let request = Request::builder()
        .method("GET")
        .uri("/api/species/missingno")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn test_usage_lookup_hit() {
    let (app, _static_dir) = setup_app(vec![1.0]);

    let request = Request::builder()
        .method("GET")
        .uri("/api/usage/HAUNTER")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["usage"], 0.0123);
}

#[tokio::test]
async fn test_usage_miss_answers_empty_object() {
    let (app, _static_dir) = setup_app(vec![1.0]);

    let request = Request::builder()
        .method("GET")
        .uri("/api/usage/missingno")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({}));
}
