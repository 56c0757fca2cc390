// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Aggregation orchestration
//!
//! Coordinates the provider registry, rate limiter, caches, and the
//! concurrent fan-out across provider adapters. Provider-scoped failures are
//! absorbed here: they cost that provider its contribution and flip its
//! registry status, but the search still answers. Only pipeline faults
//! (cache/registry malfunction) reach the caller.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration as ChronoDuration, Utc};
use tracing::{debug, info, warn};

use super::cache::{query_key, CacheStats, TtlCache};
use super::config::EngineConfig;
use super::provider::ContentProvider;
use super::providers::{
    EncyclopediaProvider, NewsProvider, RegionalFeedProvider, SocialProvider, VideoProvider,
};
use super::rate_limiter::RateLimiter;
use super::registry::ProviderRegistry;
use super::trending::TrendingPolicy;
use super::types::{
    EngineError, Provider, ProviderStatus, SearchQuery, SearchResults,
};

/// Hard cap on items returned by one search
pub const MAX_RESULTS: usize = 50;

/// The aggregation engine entry point
pub struct ContentEngine {
    registry: Arc<ProviderRegistry>,
    providers: Vec<Arc<dyn ContentProvider>>,
    rate_limiter: RateLimiter,
    results_cache: TtlCache<SearchResults>,
    topic_cache: TtlCache<SearchResults>,
    default_language: String,
}

impl ContentEngine {
    /// Build the engine with the standard adapter set from configuration
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let trending = TrendingPolicy::default();
        let timeout = config.request_timeout_ms;
        let creds = &config.providers;

        let providers: Vec<Arc<dyn ContentProvider>> = vec![
            Arc::new(VideoProvider::new(
                creds.youtube_api_key.clone().unwrap_or_default(),
                trending,
                timeout,
            )),
            Arc::new(NewsProvider::new(
                creds.news_api_key.clone().unwrap_or_default(),
                trending,
                timeout,
            )),
            Arc::new(EncyclopediaProvider::new(creds.encyclopedia_enabled, timeout)),
            Arc::new(RegionalFeedProvider::new(
                creds.regional_feed_urls.clone(),
                trending,
                timeout,
                config.default_region.clone(),
            )),
            Arc::new(SocialProvider::new(
                creds.social_api_token.clone().unwrap_or_default(),
                creds.social_base_url.clone(),
                trending,
                timeout,
            )),
        ];

        Self::from_parts(config, providers)
    }

    /// Build the engine from an explicit adapter set
    ///
    /// Adapter registration order is also the deterministic tie-break order
    /// during merge ranking.
    pub fn from_parts(
        config: EngineConfig,
        providers: Vec<Arc<dyn ContentProvider>>,
    ) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::pipeline)?;

        let registry = Arc::new(ProviderRegistry::new());
        for provider in &providers {
            // Credential-less providers start inactive and stay out of every
            // fan-out until configuration changes at restart
            let status = if provider.is_configured() {
                ProviderStatus::Active
            } else {
                ProviderStatus::Inactive
            };
            registry.register(Provider::new(
                provider.id(),
                provider.display_name(),
                provider.icon(),
                status,
            ))?;
            debug!("Registered provider {} ({:?})", provider.id(), status);
        }

        let results_cache =
            TtlCache::with_ttl_secs(config.search_cache_ttl_secs, config.cache_max_entries);
        let topic_cache =
            TtlCache::with_ttl_secs(config.topic_cache_ttl_secs, config.cache_max_entries);

        Ok(Self {
            registry,
            providers,
            rate_limiter: RateLimiter::new(),
            results_cache,
            topic_cache,
            default_language: config.default_language,
        })
    }

    /// Perform an aggregated search across all eligible providers
    ///
    /// Returns an empty result set when no provider is eligible or all of
    /// them fail; only a pipeline fault is an error.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, EngineError> {
        let key = query_key(query);

        if let Some(hit) = self.results_cache.get(&key)? {
            debug!("Cache hit for query: {}", query.text);
            return Ok(hit);
        }

        let start = Instant::now();
        let eligible = self.eligible_providers(query)?;

        if eligible.is_empty() {
            debug!("No eligible providers for query: {}", query.text);
            let results = SearchResults::empty();
            self.results_cache.put(&key, results.clone())?;
            return Ok(results);
        }

        // Fan out one isolated call per eligible provider
        let calls = eligible.iter().map(|provider| {
            let provider = Arc::clone(provider);
            async move { (provider.id(), provider.search(query).await) }
        });
        let outcomes = futures::future::join_all(calls).await;

        // Fan in, tolerating individual failures
        let mut items = Vec::new();
        let mut sources = Vec::new();
        for (provider_id, outcome) in outcomes {
            match outcome {
                Ok(provider_items) => {
                    debug!("{} returned {} items", provider_id, provider_items.len());
                    sources.push(provider_id.to_string());
                    items.extend(provider_items);
                }
                Err(EngineError::RateLimited {
                    retry_after_secs, ..
                }) => {
                    warn!(
                        "{} rate limited, retry after {}s",
                        provider_id, retry_after_secs
                    );
                    let resets_at = Utc::now() + ChronoDuration::seconds(retry_after_secs as i64);
                    self.rate_limiter
                        .record_limit_hit(provider_id, 0, resets_at)?;
                    self.registry
                        .set_status(provider_id, ProviderStatus::RateLimited)?;
                    self.registry.set_quota(provider_id, 0, resets_at)?;
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", provider_id, e);
                    self.registry.set_status(provider_id, ProviderStatus::Error)?;
                }
            }
        }

        // Stable sort keeps provider iteration order on rank ties, so
        // identical inputs always merge to the same ordering
        items.sort_by(|a, b| {
            b.stats
                .trending
                .cmp(&a.stats.trending)
                .then(b.published_at.cmp(&a.published_at))
        });

        let total_count = items.len();
        items.truncate(MAX_RESULTS);

        let results = SearchResults {
            items,
            total_count,
            has_more: total_count > MAX_RESULTS,
            search_time_ms: start.elapsed().as_millis() as u64,
            sources,
        };

        info!(
            "Search '{}': {} items from {} providers in {}ms",
            query.text,
            results.total_count,
            results.sources.len(),
            results.search_time_ms
        );

        self.results_cache.put(&key, results.clone())?;
        Ok(results)
    }

    /// Topic aggregate with its own longer-lived cache namespace
    pub async fn topic_aggregate(&self, topic: &str) -> Result<SearchResults, EngineError> {
        let key = format!("topic:{}", topic.trim().to_lowercase());

        if let Some(hit) = self.topic_cache.get(&key)? {
            debug!("Topic cache hit: {}", topic);
            return Ok(hit);
        }

        let results = self.search(&SearchQuery::new(topic)).await?;
        self.topic_cache.put(&key, results.clone())?;
        Ok(results)
    }

    /// All registered providers, for dashboards
    pub fn list_providers(&self) -> Result<Vec<Provider>, EngineError> {
        self.registry.list()
    }

    /// Providers currently marked active
    pub fn list_active_providers(&self) -> Result<Vec<Provider>, EngineError> {
        self.registry.list_active()
    }

    /// Status of one provider, or `None` when unknown
    pub fn provider_status(&self, id: &str) -> Result<Option<Provider>, EngineError> {
        self.registry.get(id)
    }

    /// Shared registry handle, used to wire up the health monitor
    pub fn registry(&self) -> Arc<ProviderRegistry> {
        Arc::clone(&self.registry)
    }

    /// Adapter set, used to wire up the health monitor
    pub fn adapters(&self) -> Vec<Arc<dyn ContentProvider>> {
        self.providers.clone()
    }

    /// Rate limiter handle for introspection and tests
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Configured language applied to queries that do not specify one
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn cache_stats(&self) -> Result<CacheStats, EngineError> {
        self.results_cache.stats()
    }

    pub fn clear_caches(&self) -> Result<(), EngineError> {
        self.results_cache.clear()?;
        self.topic_cache.clear()
    }

    fn eligible_providers(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Arc<dyn ContentProvider>>, EngineError> {
        let mut eligible = Vec::new();
        for provider in &self.providers {
            let id = provider.id();
            if !query.platforms.is_empty() && !query.platforms.iter().any(|p| p == id) {
                continue;
            }
            let record = self.registry.get(id)?;
            let active = matches!(
                record.map(|r| r.status),
                Some(ProviderStatus::Active)
            );
            if !active {
                continue;
            }
            if !self.rate_limiter.allow(id)? {
                debug!("{} excluded by rate limiter", id);
                continue;
            }
            eligible.push(Arc::clone(provider));
        }
        Ok(eligible)
    }
}
