//! fielddex-sv - Species classification server
//!
//! Serves live classification results to camera clients and enriches them
//! with reference data (dex records, competitive-usage statistics). The
//! model itself runs in an external model service; this process owns label
//! resolution, per-client stability tracking, and the reference lookups.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use fielddex_common::StabilityTracker;
use fielddex_sv::classifier::RemoteClassifier;
use fielddex_sv::config::{Args, Config};
use fielddex_sv::{build_router, datasets, AppState};

/// How often idle client histories are swept out
const IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting FieldDex classification server (fielddex-sv) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config::from_args(Args::parse());
    info!("Data folder: {}", config.data_folder.display());

    // Fail fast: a malformed label schema must not start serving
    let data = match datasets::load(&config.data_folder) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to load reference data: {}", e);
            return Err(e.into());
        }
    };

    let tracker = Arc::new(StabilityTracker::with_limits(
        config.tracker_capacity,
        config.tracker_idle,
    ));
    spawn_idle_sweeper(Arc::clone(&tracker));

    let classifier = Arc::new(RemoteClassifier::new(config.inference_url.clone())?);
    info!("Model service endpoint: {}", config.inference_url);

    let state = AppState::new(data, tracker, classifier);
    let app = build_router(state, &config.data_folder);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("fielddex-sv listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Peer addresses feed the client-identity fallback
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Periodically drop client histories that have gone idle, bounding memory
/// between bursts of new identities.
fn spawn_idle_sweeper(tracker: Arc<StabilityTracker>) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(IDLE_SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            let dropped = tracker.evict_idle();
            if dropped > 0 {
                info!(
                    "Dropped {} idle client histories ({} still tracked)",
                    dropped,
                    tracker.tracked_clients()
                );
            }
        }
    });
}
