// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the content aggregation engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Health/availability status of a content provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStatus {
    /// Provider is reachable and may be queried
    Active,
    /// Provider is not configured (e.g., missing credentials); never queried
    Inactive,
    /// Last probe or search against the provider failed
    Error,
    /// Upstream signaled throttling; excluded until the limit window resets
    RateLimited,
}

/// A registered external content source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Stable provider identifier (e.g., "youtube", "newsapi")
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Current status, maintained by the health monitor and rate limiter
    pub status: ProviderStatus,
    /// Capability icon for dashboards
    pub icon: String,
    /// Last time status or quota was updated
    pub last_updated: DateTime<Utc>,
    /// Remaining upstream quota, if the provider reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_quota: Option<u32>,
    /// When the upstream quota window resets, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_resets_at: Option<DateTime<Utc>>,
}

impl Provider {
    /// Create a provider record with the given initial status
    pub fn new(id: &str, name: &str, icon: &str, status: ProviderStatus) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status,
            icon: icon.to_string(),
            last_updated: Utc::now(),
            remaining_quota: None,
            quota_resets_at: None,
        }
    }
}

/// Kind of content an item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Video,
    Article,
    Post,
    Reel,
    Story,
}

/// Engagement statistics for a content item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    /// Classified by the shared trending policy, consistent across providers
    pub trending: bool,
}

impl ContentStats {
    /// Total engagement across all counters
    pub fn engagement(&self) -> u64 {
        self.views + self.likes + self.shares + self.comments
    }
}

/// A normalized content item from any provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Provider-scoped identifier, unique within one result set
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Canonical URL of the item
    pub url: String,
    /// Id of the provider that produced this item
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub stats: ContentStats,
    pub content_type: ContentType,
    /// Platform tag (matches the provider id for first-party content)
    pub platform: String,
    pub language: String,
    /// Geographic scope, when the item is region-bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Geographic scope of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    World,
    Local,
}

/// Inclusive published-date window for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// A logical search across all configured providers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Free-text query
    pub text: String,
    pub scope: SearchScope,
    /// Requested provider subset; empty means all providers
    #[serde(default)]
    pub platforms: Vec<String>,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// Location qualifier applied when scope is `Local`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl SearchQuery {
    /// Create a world-scoped query with default language
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            scope: SearchScope::World,
            platforms: Vec::new(),
            language: "en".to_string(),
            date_range: None,
            location: None,
        }
    }

    /// Query text with the regional qualifier applied for local scope
    pub fn effective_text(&self) -> String {
        match (&self.scope, &self.location) {
            (SearchScope::Local, Some(location)) => format!("{} {}", self.text, location),
            _ => self.text.clone(),
        }
    }
}

/// Result of one aggregated search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Ranked items, capped at [`MAX_RESULTS`](crate::aggregator::MAX_RESULTS)
    pub items: Vec<ContentItem>,
    /// Candidate count before the cap was applied
    pub total_count: usize,
    pub has_more: bool,
    pub search_time_ms: u64,
    /// Ids of providers that contributed items to this result
    pub sources: Vec<String>,
}

impl SearchResults {
    /// An empty result set (valid zero-match outcome, not an error)
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            has_more: false,
            search_time_ms: 0,
            sources: Vec::new(),
        }
    }
}

/// Errors raised inside the aggregation engine
///
/// Everything except `PipelineFault` is absorbed at the orchestrator
/// boundary: a failed provider contributes zero items and has its registry
/// status updated, and the search still returns a (possibly empty) result.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Provider has no credentials configured; the call was not attempted
    #[error("No credentials configured for {provider}")]
    NoCredentials { provider: String },

    /// Provider is not in a queryable state; the call was not attempted
    #[error("Provider unavailable: {provider}")]
    ProviderUnavailable { provider: String },

    /// Upstream API returned an error response
    #[error("{provider} API error: {status} - {message}")]
    ApiError {
        provider: String,
        status: u16,
        message: String,
    },

    /// Upstream payload could not be decoded into the common content model
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    /// Provider call exceeded its per-adapter timeout
    #[error("{provider} timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    /// Upstream signaled throttling (HTTP 429 or quota exhaustion)
    #[error("{provider} rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },

    /// The aggregation mechanism itself malfunctioned (cache/registry);
    /// the only variant that propagates to callers of `search`
    #[error("Pipeline fault: {message}")]
    PipelineFault { message: String },
}

impl EngineError {
    /// Provider this error is scoped to, if any
    pub fn provider(&self) -> Option<&str> {
        match self {
            EngineError::NoCredentials { provider }
            | EngineError::ProviderUnavailable { provider }
            | EngineError::ApiError { provider, .. }
            | EngineError::MalformedResponse { provider, .. }
            | EngineError::Timeout { provider, .. }
            | EngineError::RateLimited { provider, .. } => Some(provider),
            EngineError::PipelineFault { .. } => None,
        }
    }

    /// Build a pipeline fault from any message-able cause
    pub fn pipeline(message: impl Into<String>) -> Self {
        EngineError::PipelineFault {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_item() -> ContentItem {
        ContentItem {
            id: "yt-1".to_string(),
            title: "Town hall recording".to_string(),
            description: "Full session".to_string(),
            thumbnail: None,
            url: "https://example.com/v/1".to_string(),
            source: "youtube".to_string(),
            published_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            stats: ContentStats::default(),
            content_type: ContentType::Video,
            platform: "youtube".to_string(),
            language: "en".to_string(),
            region: None,
            tags: vec!["civic".to_string()],
        }
    }

    #[test]
    fn test_content_item_serialization_camel_case() {
        let json = serde_json::to_string(&sample_item()).unwrap();
        assert!(json.contains("publishedAt"));
        assert!(json.contains("contentType"));
        // None fields are skipped
        assert!(!json.contains("thumbnail"));
    }

    #[test]
    fn test_provider_status_serialization() {
        let json = serde_json::to_string(&ProviderStatus::RateLimited).unwrap();
        assert_eq!(json, "\"rate_limited\"");
    }

    #[test]
    fn test_effective_text_local_scope() {
        let mut query = SearchQuery::new("recycling debate");
        query.scope = SearchScope::Local;
        query.location = Some("Lisbon".to_string());
        assert_eq!(query.effective_text(), "recycling debate Lisbon");
    }

    #[test]
    fn test_effective_text_world_scope_ignores_location() {
        let mut query = SearchQuery::new("recycling debate");
        query.location = Some("Lisbon".to_string());
        assert_eq!(query.effective_text(), "recycling debate");
    }

    #[test]
    fn test_empty_results() {
        let results = SearchResults::empty();
        assert!(results.items.is_empty());
        assert_eq!(results.total_count, 0);
        assert!(!results.has_more);
        assert!(results.sources.is_empty());
    }

    #[test]
    fn test_engagement_sum() {
        let stats = ContentStats {
            views: 10,
            likes: 5,
            shares: 2,
            comments: 3,
            trending: false,
        };
        assert_eq!(stats.engagement(), 20);
    }

    #[test]
    fn test_error_provider_accessor() {
        let err = EngineError::ApiError {
            provider: "newsapi".to_string(),
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.provider(), Some("newsapi"));

        let fault = EngineError::pipeline("cache poisoned");
        assert_eq!(fault.provider(), None);
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::RateLimited {
            provider: "youtube".to_string(),
            retry_after_secs: 60,
        };
        assert!(err.to_string().contains("60"));
    }
}
