// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YouTube video search adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;

use super::request_error;
use crate::aggregator::provider::ContentProvider;
use crate::aggregator::trending::TrendingPolicy;
use crate::aggregator::types::{
    ContentItem, ContentStats, ContentType, EngineError, SearchQuery,
};

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

const PROVIDER_ID: &str = "youtube";

/// YouTube Data API v3 search adapter
pub struct VideoProvider {
    api_key: String,
    client: Client,
    trending: TrendingPolicy,
    timeout_ms: u64,
}

impl VideoProvider {
    pub fn new(api_key: String, trending: TrendingPolicy, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            client,
            trending,
            timeout_ms,
        }
    }

    fn map_item(&self, raw: YoutubeItem, language: &str) -> Option<ContentItem> {
        let video_id = raw.id.video_id?;
        let snippet = raw.snippet?;

        let published_at = snippet
            .published_at
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        // The search endpoint carries no statistics; counters stay zero
        let mut stats = ContentStats {
            views: 0,
            likes: 0,
            shares: 0,
            comments: 0,
            trending: false,
        };
        stats.trending = self.trending.classify(published_at, &stats);

        Some(ContentItem {
            url: format!("https://www.youtube.com/watch?v={}", video_id),
            id: video_id,
            title: snippet.title.unwrap_or_else(|| "Untitled video".to_string()),
            description: snippet.description.unwrap_or_default(),
            thumbnail: snippet
                .thumbnails
                .and_then(|t| t.medium.or(t.default))
                .map(|t| t.url),
            source: PROVIDER_ID.to_string(),
            published_at,
            stats,
            content_type: ContentType::Video,
            platform: PROVIDER_ID.to_string(),
            language: language.to_string(),
            region: None,
            tags: snippet.channel_title.into_iter().collect(),
        })
    }

    async fn request(&self, text: &str, query: Option<&SearchQuery>) -> Result<YoutubeResponse, EngineError> {
        let mut params: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("q", text.to_string()),
            ("maxResults", "25".to_string()),
        ];
        if let Some(query) = query {
            params.push(("relevanceLanguage", query.language.clone()));
            if let Some(range) = &query.date_range {
                params.push(("publishedAfter", range.from.to_rfc3339()));
                params.push(("publishedBefore", range.to.to_rfc3339()));
            }
        }

        let response = self
            .client
            .get(YOUTUBE_SEARCH_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| request_error(PROVIDER_ID, self.timeout_ms, e))?;

        let status = response.status();

        if status == 429 {
            return Err(EngineError::RateLimited {
                provider: PROVIDER_ID.to_string(),
                retry_after_secs: 3600,
            });
        }

        if status == 403 {
            // YouTube reports quota exhaustion as 403 with a quota reason
            let body = response.text().await.unwrap_or_default();
            if body.contains("quota") {
                return Err(EngineError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                    retry_after_secs: 3600,
                });
            }
            return Err(EngineError::NoCredentials {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == 401 {
            return Err(EngineError::NoCredentials {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EngineError::ApiError {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| EngineError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl ContentProvider for VideoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "YouTube"
    }

    fn icon(&self) -> &'static str {
        "video"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ContentItem>, EngineError> {
        let data = self.request(&query.effective_text(), Some(query)).await?;

        Ok(data
            .items
            .into_iter()
            .filter_map(|raw| self.map_item(raw, &query.language))
            .collect())
    }

    async fn probe(&self) -> Result<(), EngineError> {
        self.request("ping", None).await.map(|_| ())
    }
}

#[derive(Debug, serde::Deserialize)]
struct YoutubeResponse {
    #[serde(default)]
    items: Vec<YoutubeItem>,
}

#[derive(Debug, serde::Deserialize)]
struct YoutubeItem {
    id: YoutubeId,
    snippet: Option<YoutubeSnippet>,
}

#[derive(Debug, serde::Deserialize)]
struct YoutubeId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct YoutubeSnippet {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    thumbnails: Option<YoutubeThumbnails>,
    #[serde(rename = "channelTitle")]
    channel_title: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct YoutubeThumbnails {
    medium: Option<YoutubeThumbnail>,
    default: Option<YoutubeThumbnail>,
}

#[derive(Debug, serde::Deserialize)]
struct YoutubeThumbnail {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> VideoProvider {
        VideoProvider::new("test-key".to_string(), TrendingPolicy::default(), 10_000)
    }

    #[test]
    fn test_provider_metadata() {
        let provider = provider();
        assert_eq!(provider.id(), "youtube");
        assert_eq!(provider.icon(), "video");
        assert!(provider.is_configured());
    }

    #[test]
    fn test_empty_key_not_configured() {
        let provider = VideoProvider::new(String::new(), TrendingPolicy::default(), 10_000);
        assert!(!provider.is_configured());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "items": [
                {
                    "id": {"videoId": "abc123"},
                    "snippet": {
                        "title": "Council meeting",
                        "description": "Live stream",
                        "publishedAt": "2025-06-01T12:00:00Z",
                        "channelTitle": "City Channel",
                        "thumbnails": {"medium": {"url": "https://img.example/m.jpg"}}
                    }
                }
            ]
        }"#;

        let response: YoutubeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 1);
    }

    #[test]
    fn test_map_item_full() {
        let json = r#"{
            "id": {"videoId": "abc123"},
            "snippet": {
                "title": "Council meeting",
                "description": "Live stream",
                "publishedAt": "2025-06-01T12:00:00Z",
                "channelTitle": "City Channel",
                "thumbnails": {"medium": {"url": "https://img.example/m.jpg"}}
            }
        }"#;
        let raw: YoutubeItem = serde_json::from_str(json).unwrap();

        let item = provider().map_item(raw, "en").unwrap();
        assert_eq!(item.id, "abc123");
        assert_eq!(item.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(item.content_type, ContentType::Video);
        assert_eq!(item.source, "youtube");
        assert_eq!(item.thumbnail.as_deref(), Some("https://img.example/m.jpg"));
        assert_eq!(item.tags, vec!["City Channel".to_string()]);
    }

    #[test]
    fn test_map_item_defaults_missing_fields() {
        let json = r#"{
            "id": {"videoId": "abc123"},
            "snippet": {}
        }"#;
        let raw: YoutubeItem = serde_json::from_str(json).unwrap();

        let item = provider().map_item(raw, "en").unwrap();
        assert_eq!(item.title, "Untitled video");
        assert_eq!(item.description, "");
        assert!(item.thumbnail.is_none());
        assert_eq!(item.published_at, DateTime::<Utc>::UNIX_EPOCH);
        assert!(!item.stats.trending);
    }

    #[test]
    fn test_map_item_without_video_id_is_dropped() {
        let json = r#"{"id": {}, "snippet": {"title": "x"}}"#;
        let raw: YoutubeItem = serde_json::from_str(json).unwrap();
        assert!(provider().map_item(raw, "en").is_none());
    }
}
