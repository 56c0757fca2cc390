// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use civic_content_engine::{
    aggregator::{ContentEngine, EngineConfig, HealthMonitor},
    api,
    version,
};

/// Multi-source content aggregation engine for the civic platform
#[derive(Debug, Parser)]
#[command(name = "content-engine", version = version::VERSION_NUMBER)]
struct Args {
    /// Address to bind the HTTP API to
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    tracing::info!("Starting {}", version::get_version_string());

    let config = EngineConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    if !config.has_any_provider() {
        tracing::warn!("No content providers configured; searches will return empty results");
    }

    let health_interval = Duration::from_secs(config.health_interval_secs);
    let engine = Arc::new(ContentEngine::new(config)?);

    // Health monitoring runs on its own timer, independent of search traffic
    let monitor = HealthMonitor::new(engine.registry(), engine.adapters(), health_interval);
    tokio::spawn(monitor.run());

    api::start_server(engine, args.bind)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}
