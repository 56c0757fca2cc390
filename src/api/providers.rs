// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider status introspection endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::aggregator::Provider;
use crate::api::server::AppState;

/// GET /v1/providers - all registered providers with current status
pub async fn list_providers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Provider>>, (StatusCode, String)> {
    state
        .engine
        .list_providers()
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// GET /v1/providers/active - providers currently marked active
pub async fn active_providers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Provider>>, (StatusCode, String)> {
    state
        .engine
        .list_active_providers()
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// GET /v1/providers/{id} - one provider's status, 404 when unknown
pub async fn provider_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Provider>, (StatusCode, String)> {
    let provider = state
        .engine
        .provider_status(&id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match provider {
        Some(p) => Ok(Json(p)),
        None => Err((StatusCode::NOT_FOUND, format!("Unknown provider '{}'", id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_exist() {
        let _ = list_providers_handler;
        let _ = active_providers_handler;
        let _ = provider_status_handler;
    }
}
