// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Router wiring and server startup

use axum::{
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::ContentEngine;

use super::digest::digest_handler;
use super::providers::{
    active_providers_handler, list_providers_handler, provider_status_handler,
};
use super::search::search_handler;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ContentEngine>,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/search", get(search_handler))
        .route("/v1/providers", get(list_providers_handler))
        .route("/v1/providers/active", get(active_providers_handler))
        .route("/v1/providers/:id", get(provider_status_handler))
        .route("/v1/digest", get(digest_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn start_server(
    engine: Arc<ContentEngine>,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(AppState { engine });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Content engine API listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": crate::version::VERSION_NUMBER,
    }))
}
