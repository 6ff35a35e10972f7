//! `fitment serve`

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

use fitment_config::{redacted_snapshot, FitmentConfig};
use fitment_gateway::{start_server, GatewayState};
use fitment_inference::FitmentAnalyser;

pub async fn run(mut config: FitmentConfig, port: Option<u16>, bind: Option<String>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    info!(config = %redacted_snapshot(&config), "Starting fitment server");

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.server.bind, config.server.port))?;

    let analyser = FitmentAnalyser::from_config(&config)?;
    start_server(addr, GatewayState::new(analyser, config.server.max_upload_bytes)).await
}
