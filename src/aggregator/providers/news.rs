// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! News search API adapter (NewsAPI-compatible)

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

const NEWS_SEARCH_URL: &str = "https://newsapi.org/v2/everything";

const PROVIDER_ID: &str = "newsapi";

/// NewsAPI `everything` search adapter
pub struct NewsProvider {
    api_key: String,
    client: Client,
    trending: TrendingPolicy,
    timeout_ms: u64,
}

impl NewsProvider {
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

    fn map_article(&self, raw: NewsArticle, language: &str, index: usize) -> Option<ContentItem> {
        let url = raw.url?;

        let published_at = raw
            .published_at
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
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
            title: raw.title.unwrap_or_else(|| "Untitled article".to_string()),
            description: raw.description.unwrap_or_default(),
            thumbnail: raw.url_to_image,
            url,
            source: PROVIDER_ID.to_string(),
            published_at,
            stats,
            content_type: ContentType::Article,
            platform: PROVIDER_ID.to_string(),
            language: language.to_string(),
            region: None,
            tags: raw.source.and_then(|s| s.name).into_iter().collect(),
        })
    }

    async fn request(&self, text: &str, query: Option<&SearchQuery>) -> Result<NewsResponse, EngineError> {
        let mut params: Vec<(&str, String)> = vec![
            ("q", text.to_string()),
            ("pageSize", "25".to_string()),
            ("sortBy", "publishedAt".to_string()),
        ];
        if let Some(query) = query {
            params.push(("language", query.language.clone()));
            if let Some(range) = &query.date_range {
                params.push(("from", range.from.to_rfc3339()));
                params.push(("to", range.to.to_rfc3339()));
            }
        }

        let response = self
            .client
            .get(NEWS_SEARCH_URL)
            .header("X-Api-Key", &self.api_key)
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
impl ContentProvider for NewsProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "News Search"
    }

    fn icon(&self) -> &'static str {
        "newspaper"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ContentItem>, EngineError> {
        let data = self.request(&query.effective_text(), Some(query)).await?;

        Ok(data
            .articles
            .into_iter()
            .enumerate()
            .filter_map(|(i, raw)| self.map_article(raw, &query.language, i))
            .collect())
    }

    async fn probe(&self) -> Result<(), EngineError> {
        self.request("ping", None).await.map(|_| ())
    }
}

#[derive(Debug, serde::Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

#[derive(Debug, serde::Deserialize)]
struct NewsArticle {
    source: Option<NewsSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct NewsSource {
    name: Option<String>,
}
