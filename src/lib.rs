// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod aggregator;
pub mod api;
pub mod version;

// Re-export main types
pub use aggregator::{
    ContentEngine, ContentItem, ContentProvider, ContentStats, ContentType, EngineConfig,
    EngineError, FallbackGenerator, HealthMonitor, Provider, ProviderRegistry, ProviderStatus,
    SearchQuery, SearchResults, SearchScope, TrendingPolicy, MAX_RESULTS,
};
