// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Social platform adapter (Mastodon-compatible search)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;

use super::{request_error, strip_html};
use crate::aggregator::provider::ContentProvider;
use crate::aggregator::trending::TrendingPolicy;
use crate::aggregator::types::{
    ContentItem, ContentStats, ContentType, EngineError, SearchQuery,
};

const PROVIDER_ID: &str = "social";

const TITLE_MAX_CHARS: usize = 80;

/// Mastodon-compatible `/api/v2/search` adapter
pub struct SocialProvider {
    api_token: String,
    base_url: String,
    client: Client,
    trending: TrendingPolicy,
    timeout_ms: u64,
}

impl SocialProvider {
    pub fn new(
        api_token: String,
        base_url: String,
        trending: TrendingPolicy,
        timeout_ms: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            trending,
            timeout_ms,
        }
    }

    fn map_status(&self, raw: Status, language: &str) -> Option<ContentItem> {
        let url = raw.url?;
        let text = strip_html(&raw.content.unwrap_or_default());

        let published_at = raw
            .created_at
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        let mut stats = ContentStats {
            views: 0,
            likes: raw.favourites_count.unwrap_or(0),
            shares: raw.reblogs_count.unwrap_or(0),
            comments: raw.replies_count.unwrap_or(0),
            trending: false,
        };
        stats.trending = self.trending.classify(published_at, &stats);

        // Posts with video attachments surface as reels
        let has_video = raw
            .media_attachments
            .iter()
            .any(|m| m.kind.as_deref() == Some("video") || m.kind.as_deref() == Some("gifv"));

        let title = if text.chars().count() > TITLE_MAX_CHARS {
            let truncated: String = text.chars().take(TITLE_MAX_CHARS).collect();
            format!("{}…", truncated.trim_end())
        } else if text.is_empty() {
            raw.account
                .as_ref()
                .and_then(|a| a.display_name.clone())
                .unwrap_or_else(|| "Untitled post".to_string())
        } else {
            text.clone()
        };

        Some(ContentItem {
            id: format!("{}-{}", PROVIDER_ID, raw.id),
            title,
            description: text,
            thumbnail: raw
                .media_attachments
                .into_iter()
                .find_map(|m| m.preview_url),
            url,
            source: PROVIDER_ID.to_string(),
            published_at,
            stats,
            content_type: if has_video {
                ContentType::Reel
            } else {
                ContentType::Post
            },
            platform: PROVIDER_ID.to_string(),
            language: raw.language.unwrap_or_else(|| language.to_string()),
            region: None,
            tags: raw.tags.into_iter().map(|t| t.name).collect(),
        })
    }
}

#[async_trait]
impl ContentProvider for SocialProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Social"
    }

    fn icon(&self) -> &'static str {
        "users"
    }

    fn is_configured(&self) -> bool {
        !self.api_token.is_empty()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ContentItem>, EngineError> {
        let url = format!("{}/api/v2/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .query(&[
                ("q", query.effective_text().as_str()),
                ("type", "statuses"),
                ("limit", "25"),
            ])
            .send()
            .await
            .map_err(|e| request_error(PROVIDER_ID, self.timeout_ms, e))?;

        let status = response.status();

        if status == 429 {
            return Err(EngineError::RateLimited {
                provider: PROVIDER_ID.to_string(),
                retry_after_secs: 300,
            });
        }

        if status == 401 || status == 403 {
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

        let data: SearchEnvelope =
            response
                .json()
                .await
                .map_err(|e| EngineError::MalformedResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                })?;

        Ok(data
            .statuses
            .into_iter()
            .filter_map(|raw| self.map_status(raw, &query.language))
            .collect())
    }

    async fn probe(&self) -> Result<(), EngineError> {
        let url = format!("{}/api/v1/instance", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| request_error(PROVIDER_ID, self.timeout_ms, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::ApiError {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
                message: "instance probe failed".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, serde::Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    statuses: Vec<Status>,
}

#[derive(Debug, serde::Deserialize)]
struct Status {
    id: String,
    content: Option<String>,
    url: Option<String>,
    created_at: Option<String>,
    favourites_count: Option<u64>,
    reblogs_count: Option<u64>,
    replies_count: Option<u64>,
    language: Option<String>,
    account: Option<Account>,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    media_attachments: Vec<Media>,
}

#[derive(Debug, serde::Deserialize)]
struct Account {
    display_name: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct Tag {
    name: String,
}

#[derive(Debug, serde::Deserialize)]
struct Media {
    #[serde(rename = "type")]
    kind: Option<String>,
    preview_url: Option<String>,
}
