// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multi-source content aggregation engine
//!
//! Fans a single logical query out to a heterogeneous set of external
//! content providers, normalizes their replies into one content model,
//! tolerates partial provider failure, respects per-provider rate limits,
//! caches results with a TTL, and produces a single ranked result set.
//!
//! Key pieces:
//! - Provider registry with live status per source
//! - Advisory per-provider rate limiting
//! - TTL caches for search results and topic aggregates
//! - One adapter per external source behind the [`ContentProvider`] trait
//! - Independent periodic health monitoring
//! - Deterministic fallback content for collaborator surfaces

pub mod cache;
pub mod config;
pub mod fallback;
pub mod health;
pub mod provider;
pub mod providers;
pub mod rate_limiter;
pub mod registry;
pub mod service;
pub mod trending;
pub mod types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use fallback::FallbackGenerator;
pub use health::HealthMonitor;
pub use provider::ContentProvider;
pub use registry::ProviderRegistry;
pub use service::{ContentEngine, MAX_RESULTS};
pub use trending::TrendingPolicy;
pub use types::{
    ContentItem, ContentStats, ContentType, EngineError, Provider, ProviderStatus, SearchQuery,
    SearchResults, SearchScope,
};
