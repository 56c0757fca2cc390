// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API response types

use serde::{Deserialize, Serialize};

use crate::aggregator::{ContentItem, SearchResults};

/// Response body for GET /v1/search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiResponse {
    /// The original search query
    pub query: String,
    pub items: Vec<ContentItem>,
    /// Candidate count before the cap
    pub total_count: usize,
    pub has_more: bool,
    pub search_time_ms: u64,
    /// Provider ids that contributed items
    pub sources: Vec<String>,
}

impl SearchApiResponse {
    pub fn new(query: String, results: SearchResults) -> Self {
        Self {
            query,
            items: results.items,
            total_count: results.total_count,
            has_more: results.has_more,
            search_time_ms: results.search_time_ms,
            sources: results.sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_from_results() {
        let response =
            SearchApiResponse::new("transit".to_string(), SearchResults::empty());
        assert_eq!(response.query, "transit");
        assert_eq!(response.total_count, 0);
        assert!(!response.has_more);
    }

    #[test]
    fn test_response_serialization() {
        let response =
            SearchApiResponse::new("transit".to_string(), SearchResults::empty());
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("totalCount"));
        assert!(json.contains("hasMore"));
    }
}
