// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the content aggregation engine

use std::env;

/// Engine-wide configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Per-provider credentials and sources
    pub providers: ProviderCredentials,
    /// TTL for cached search results in seconds
    pub search_cache_ttl_secs: u64,
    /// TTL for cached topic aggregates in seconds
    pub topic_cache_ttl_secs: u64,
    /// Maximum entries per cache namespace
    pub cache_max_entries: usize,
    /// Health monitor probe interval in seconds
    pub health_interval_secs: u64,
    /// Per-adapter request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Default language for queries that do not specify one
    pub default_language: String,
    /// Default region qualifier for local-scope queries without a location
    pub default_region: Option<String>,
}

/// Credentials and source lists per provider
///
/// A provider with no credentials (or no feed URLs) is registered as
/// `inactive` and never queried.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub youtube_api_key: Option<String>,
    pub news_api_key: Option<String>,
    pub social_api_token: Option<String>,
    /// Base URL of the Mastodon-compatible social instance
    pub social_base_url: String,
    /// Regional RSS feed URLs
    pub regional_feed_urls: Vec<String>,
    /// Encyclopedic lookup needs no key; allow disabling it outright
    pub encyclopedia_enabled: bool,
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            providers: ProviderCredentials {
                youtube_api_key: non_empty(env::var("YOUTUBE_API_KEY").ok()),
                news_api_key: non_empty(env::var("NEWS_API_KEY").ok()),
                social_api_token: non_empty(env::var("SOCIAL_API_TOKEN").ok()),
                social_base_url: env::var("SOCIAL_BASE_URL")
                    .unwrap_or_else(|_| "https://mastodon.social".to_string()),
                regional_feed_urls: env::var("REGIONAL_FEED_URLS")
                    .map(|v| {
                        v.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
                encyclopedia_enabled: env::var("ENCYCLOPEDIA_ENABLED")
                    .map(|v| v.to_lowercase() != "false")
                    .unwrap_or(true),
            },
            search_cache_ttl_secs: env::var("SEARCH_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            topic_cache_ttl_secs: env::var("TOPIC_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            health_interval_secs: env::var("HEALTH_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            request_timeout_ms: env::var("PROVIDER_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            default_language: env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            default_region: non_empty(env::var("DEFAULT_REGION").ok()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.search_cache_ttl_secs == 0 {
            return Err("Search cache TTL must be greater than 0".to_string());
        }
        if self.topic_cache_ttl_secs < self.search_cache_ttl_secs {
            return Err("Topic cache TTL must not be shorter than the search TTL".to_string());
        }
        if self.cache_max_entries == 0 {
            return Err("Cache capacity must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("Provider timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Check if any credentialed provider is configured
    pub fn has_any_provider(&self) -> bool {
        self.providers.youtube_api_key.is_some()
            || self.providers.news_api_key.is_some()
            || self.providers.social_api_token.is_some()
            || !self.providers.regional_feed_urls.is_empty()
            || self.providers.encyclopedia_enabled
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            providers: ProviderCredentials {
                youtube_api_key: None,
                news_api_key: None,
                social_api_token: None,
                social_base_url: "https://mastodon.social".to_string(),
                regional_feed_urls: Vec::new(),
                encyclopedia_enabled: true,
            },
            search_cache_ttl_secs: 300,
            topic_cache_ttl_secs: 900,
            cache_max_entries: 1000,
            health_interval_secs: 60,
            request_timeout_ms: 10_000,
            default_language: "en".to_string(),
            default_region: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.search_cache_ttl_secs, 300);
        assert_eq!(config.topic_cache_ttl_secs, 900);
        assert!(config.providers.encyclopedia_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_has_any_provider_with_defaults() {
        // Encyclopedia needs no key, so the default config has a provider
        let config = EngineConfig::default();
        assert!(config.has_any_provider());
    }

    #[test]
    fn test_has_any_provider_all_disabled() {
        let mut config = EngineConfig::default();
        config.providers.encyclopedia_enabled = false;
        assert!(!config.has_any_provider());

        config.providers.news_api_key = Some("key".to_string());
        assert!(config.has_any_provider());
    }

    #[test]
    fn test_validation_zero_search_ttl() {
        let mut config = EngineConfig::default();
        config.search_cache_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_topic_ttl_shorter_than_search() {
        let mut config = EngineConfig::default();
        config.topic_cache_ttl_secs = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut config = EngineConfig::default();
        config.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_empty_filter() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("key".to_string())), Some("key".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
