// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! News digest endpoint
//!
//! Collaborator surface on top of the engine's topic aggregates. When live
//! aggregation yields nothing, the response is substituted with deterministic
//! fallback placeholders so the digest is never empty.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::{ContentItem, FallbackGenerator};
use crate::api::server::AppState;

const DIGEST_FALLBACK_COUNT: usize = 5;

/// Query parameters for GET /v1/digest
#[derive(Debug, Clone, Deserialize)]
pub struct DigestRequest {
    /// Digest topic (defaults to a general community digest)
    #[serde(default)]
    pub topic: Option<String>,
}

/// Response body for GET /v1/digest
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestResponse {
    pub topic: String,
    pub items: Vec<ContentItem>,
    /// True when placeholder content was substituted for live results
    pub fallback: bool,
}

/// GET /v1/digest - topic digest with fallback substitution
pub async fn digest_handler(
    State(state): State<AppState>,
    Query(request): Query<DigestRequest>,
) -> Result<Json<DigestResponse>, (StatusCode, String)> {
    let topic = request
        .topic
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "community news".to_string());

    let results = state
        .engine
        .topic_aggregate(&topic)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    if results.items.is_empty() {
        debug!("Digest for '{}' empty, substituting placeholders", topic);
        let items = FallbackGenerator::placeholders(&topic, DIGEST_FALLBACK_COUNT);
        return Ok(Json(DigestResponse {
            topic,
            items,
            fallback: true,
        }));
    }

    Ok(Json(DigestResponse {
        topic,
        items: results.items,
        fallback: false,
    }))
}
