//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use fitment_inference::FitmentAnalyser;

use crate::{analyse_api, control_ui, health_api};

/// Multipart framing and text fields on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub analyser: Arc<FitmentAnalyser>,
    pub max_upload_bytes: usize,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(analyser: FitmentAnalyser, max_upload_bytes: usize) -> Self {
        Self {
            analyser: Arc::new(analyser),
            max_upload_bytes,
            started_at: Instant::now(),
        }
    }
}

/// Build the router with every route and layer.
pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES);
    Router::new()
        .route("/", get(control_ui::index))
        .route("/api/health", get(health_api::get_health))
        .route("/api/analyse", post(analyse_api::analyse))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP server and runs until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    info!(
        provider = %state.analyser.provider_name(),
        model = %state.analyser.model(),
        max_upload_bytes = state.max_upload_bytes,
        "Fitment gateway listening on http://{}",
        addr
    );
    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Fitment gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
