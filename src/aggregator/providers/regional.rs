// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Regional RSS feed adapter
//!
//! Aggregates a configured list of regional news feeds. There is no upstream
//! query language; items are fetched and filtered locally against the query
//! text. A single failing feed is skipped, the adapter only errors when every
//! feed fails.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

use super::{request_error, strip_html};
use crate::aggregator::provider::ContentProvider;
use crate::aggregator::trending::TrendingPolicy;
use crate::aggregator::types::{
    ContentItem, ContentStats, ContentType, EngineError, SearchQuery,
};

const PROVIDER_ID: &str = "regional";

/// RSS-backed regional feed adapter
pub struct RegionalFeedProvider {
    feed_urls: Vec<String>,
    client: Client,
    trending: TrendingPolicy,
    timeout_ms: u64,
    default_region: Option<String>,
}

impl RegionalFeedProvider {
    pub fn new(
        feed_urls: Vec<String>,
        trending: TrendingPolicy,
        timeout_ms: u64,
        default_region: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            feed_urls,
            client,
            trending,
            timeout_ms,
            default_region,
        }
    }

    async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedItem>, EngineError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(PROVIDER_ID, self.timeout_ms, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::ApiError {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
                message: format!("feed {} returned {}", url, status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| request_error(PROVIDER_ID, self.timeout_ms, e))?;

        let rss: Rss =
            quick_xml::de::from_str(&body).map_err(|e| EngineError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("feed {}: {}", url, e),
            })?;

        Ok(rss.channel.items)
    }

    fn map_item(&self, raw: FeedItem, query: &SearchQuery, index: usize) -> Option<ContentItem> {
        let link = raw.link?;

        let published_at = raw
            .pub_date
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc2822(s).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        let mut stats = ContentStats {
            views: 0,
            likes: 0,
            shares: 0,
            comments: 0,
            trending: false,
        };
        stats.trending = self.trending.classify(published_at, &stats);

        Some(ContentItem {
            id: format!("{}-{}", PROVIDER_ID, index),
            title: raw
                .title
                .map(|t| strip_html(&t))
                .unwrap_or_else(|| "Untitled entry".to_string()),
            description: raw.description.map(|d| strip_html(&d)).unwrap_or_default(),
            thumbnail: None,
            url: link,
            source: PROVIDER_ID.to_string(),
            published_at,
            stats,
            content_type: ContentType::Article,
            platform: PROVIDER_ID.to_string(),
            language: query.language.clone(),
            region: query.location.clone().or_else(|| self.default_region.clone()),
            tags: raw.categories,
        })
    }

    /// Local text filter standing in for an upstream query language
    fn matches(item_text: &str, query_text: &str) -> bool {
        let haystack = item_text.to_lowercase();
        let mut tokens = query_text.split_whitespace().filter(|t| !t.is_empty());
        let mut any = false;
        for token in tokens.by_ref() {
            any = true;
            if haystack.contains(&token.to_lowercase()) {
                return true;
            }
        }
        // An empty query matches everything
        !any
    }
}

#[async_trait]
impl ContentProvider for RegionalFeedProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Regional Feeds"
    }

    fn icon(&self) -> &'static str {
        "map-pin"
    }

    fn is_configured(&self) -> bool {
        !self.feed_urls.is_empty()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ContentItem>, EngineError> {
        let fetches = self.feed_urls.iter().map(|url| self.fetch_feed(url));
        let outcomes = futures::future::join_all(fetches).await;

        let mut raw_items = Vec::new();
        let mut last_error = None;
        for (url, outcome) in self.feed_urls.iter().zip(outcomes) {
            match outcome {
                Ok(items) => raw_items.extend(items),
                Err(e) => {
                    warn!("Regional feed {} failed: {}", url, e);
                    last_error = Some(e);
                }
            }
        }

        if raw_items.is_empty() {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        let text = query.text.trim();
        Ok(raw_items
            .into_iter()
            .enumerate()
            .filter_map(|(i, raw)| self.map_item(raw, query, i))
            .filter(|item| Self::matches(&format!("{} {}", item.title, item.description), text))
            .collect())
    }

    async fn probe(&self) -> Result<(), EngineError> {
        let url = self
            .feed_urls
            .first()
            .ok_or_else(|| EngineError::NoCredentials {
                provider: PROVIDER_ID.to_string(),
            })?;
        self.fetch_feed(url).await.map(|_| ())
    }
}

#[derive(Debug, serde::Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, serde::Deserialize)]
struct Channel {
    #[serde(default, rename = "item")]
    items: Vec<FeedItem>,
}

#[derive(Debug, serde::Deserialize)]
struct FeedItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(default, rename = "category")]
    categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Regional News</title>
    <link>https://regional.example</link>
    <description>Local headlines</description>
    <item>
      <title>Tram line extension approved</title>
      <link>https://regional.example/tram</link>
      <description>&lt;p&gt;The council approved the new line.&lt;/p&gt;</description>
      <pubDate>Sun, 01 Jun 2025 08:00:00 +0000</pubDate>
      <category>transport</category>
    </item>
    <item>
      <title>Harvest festival dates</title>
      <link>https://regional.example/festival</link>
      <description>Dates announced for autumn.</description>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    fn provider() -> RegionalFeedProvider {
        RegionalFeedProvider::new(
            vec!["https://regional.example/rss".to_string()],
            TrendingPolicy::default(),
            10_000,
            Some("Lisbon".to_string()),
        )
    }

    #[test]
    fn test_provider_metadata() {
        let provider = provider();
        assert_eq!(provider.id(), "regional");
        assert!(provider.is_configured());
    }

    #[test]
    fn test_no_feeds_not_configured() {
        let provider =
            RegionalFeedProvider::new(Vec::new(), TrendingPolicy::default(), 10_000, None);
        assert!(!provider.is_configured());
    }

    #[test]
    fn test_feed_deserialization() {
        let rss: Rss = quick_xml::de::from_str(SAMPLE_FEED).unwrap();
        assert_eq!(rss.channel.items.len(), 2);
        assert_eq!(
            rss.channel.items[0].title.as_deref(),
            Some("Tram line extension approved")
        );
        assert_eq!(rss.channel.items[0].categories, vec!["transport"]);
    }

    #[test]
    fn test_map_item_parses_rfc2822_date() {
        let rss: Rss = quick_xml::de::from_str(SAMPLE_FEED).unwrap();
        let raw = rss.channel.items.into_iter().next().unwrap();

        let query = SearchQuery::new("tram");
        let item = provider().map_item(raw, &query, 0).unwrap();
        assert_eq!(item.published_at.to_rfc3339(), "2025-06-01T08:00:00+00:00");
        assert_eq!(item.description, "The council approved the new line.");
        assert_eq!(item.region.as_deref(), Some("Lisbon"));
        assert_eq!(item.content_type, ContentType::Article);
    }

    #[test]
    fn test_map_item_unparseable_date_defaults() {
        let rss: Rss = quick_xml::de::from_str(SAMPLE_FEED).unwrap();
        let raw = rss.channel.items.into_iter().nth(1).unwrap();

        let query = SearchQuery::new("festival");
        let item = provider().map_item(raw, &query, 1).unwrap();
        assert_eq!(item.published_at, DateTime::<Utc>::UNIX_EPOCH);
        assert!(!item.stats.trending);
    }

    #[test]
    fn test_map_item_without_link_is_dropped() {
        let raw = FeedItem {
            title: Some("orphan".to_string()),
            link: None,
            description: None,
            pub_date: None,
            categories: Vec::new(),
        };
        let query = SearchQuery::new("orphan");
        assert!(provider().map_item(raw, &query, 0).is_none());
    }

    #[test]
    fn test_query_matching() {
        assert!(RegionalFeedProvider::matches("Tram line approved", "tram"));
        assert!(RegionalFeedProvider::matches("Tram line approved", "budget tram"));
        assert!(!RegionalFeedProvider::matches("Harvest festival", "tram"));
        // Empty query matches everything
        assert!(RegionalFeedProvider::matches("anything", ""));
    }
}
