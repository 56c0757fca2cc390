// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API request types

use serde::{Deserialize, Serialize};

use crate::aggregator::{SearchQuery, SearchScope};

/// Query parameters for GET /v1/search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiRequest {
    /// Search query string (required, max 500 chars)
    pub q: String,

    /// Scope: "world" (default) or "local"
    #[serde(default)]
    pub scope: Option<String>,

    /// Comma-separated provider subset; empty means all
    #[serde(default)]
    pub platforms: Option<String>,

    /// BCP-47 style language code (default "en")
    #[serde(default)]
    pub language: Option<String>,

    /// Location qualifier for local scope
    #[serde(default)]
    pub location: Option<String>,
}

impl SearchApiRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.q.trim().is_empty() {
            return Err("Query cannot be empty".to_string());
        }
        if self.q.chars().count() > 500 {
            return Err("Query too long (max 500 characters)".to_string());
        }
        if let Some(scope) = &self.scope {
            if scope != "world" && scope != "local" {
                return Err(format!("Unknown scope '{}'", scope));
            }
        }
        Ok(())
    }

    /// Convert into the engine's query model
    pub fn into_query(self, default_language: &str) -> SearchQuery {
        let scope = match self.scope.as_deref() {
            Some("local") => SearchScope::Local,
            _ => SearchScope::World,
        };

        let platforms = self
            .platforms
            .map(|p| {
                p.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        SearchQuery {
            text: self.q,
            scope,
            platforms,
            language: self
                .language
                .unwrap_or_else(|| default_language.to_string()),
            date_range: None,
            location: self.location,
        }
    }
}
