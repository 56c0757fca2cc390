// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encyclopedic lookup adapter (Wikipedia REST search)
//!
//! Needs no API key; availability is a plain on/off switch in configuration.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;

use super::{request_error, strip_html};
use crate::aggregator::provider::ContentProvider;
use crate::aggregator::types::{
    ContentItem, ContentStats, ContentType, EngineError, SearchQuery,
};

const PROVIDER_ID: &str = "wikipedia";

/// Wikipedia REST v1 page search adapter
pub struct EncyclopediaProvider {
    enabled: bool,
    client: Client,
    timeout_ms: u64,
}

impl EncyclopediaProvider {
    pub fn new(enabled: bool, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            enabled,
            client,
            timeout_ms,
        }
    }

    fn search_url(language: &str) -> String {
        format!("https://{}.wikipedia.org/w/rest.php/v1/search/page", language)
    }

    fn map_page(raw: WikiPage, language: &str) -> ContentItem {
        let url = format!("https://{}.wikipedia.org/wiki/{}", language, raw.key);

        ContentItem {
            id: format!("{}-{}", PROVIDER_ID, raw.id),
            title: raw.title,
            description: raw
                .excerpt
                .map(|e| strip_html(&e))
                .or(raw.description)
                .unwrap_or_default(),
            thumbnail: raw.thumbnail.map(|t| {
                if t.url.starts_with("//") {
                    format!("https:{}", t.url)
                } else {
                    t.url
                }
            }),
            url,
            source: PROVIDER_ID.to_string(),
            // Search pages carry no publish timestamp; encyclopedic entries
            // never rank as trending
            published_at: DateTime::<Utc>::UNIX_EPOCH,
            stats: ContentStats::default(),
            content_type: ContentType::Article,
            platform: PROVIDER_ID.to_string(),
            language: language.to_string(),
            region: None,
            tags: Vec::new(),
        }
    }

    async fn request(&self, text: &str, language: &str) -> Result<WikiResponse, EngineError> {
        let response = self
            .client
            .get(Self::search_url(language))
            .query(&[("q", text), ("limit", "10")])
            .send()
            .await
            .map_err(|e| request_error(PROVIDER_ID, self.timeout_ms, e))?;

        let status = response.status();

        if status == 429 {
            return Err(EngineError::RateLimited {
                provider: PROVIDER_ID.to_string(),
                retry_after_secs: 60,
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
impl ContentProvider for EncyclopediaProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &'static str {
        "Wikipedia"
    }

    fn icon(&self) -> &'static str {
        "book"
    }

    fn is_configured(&self) -> bool {
        self.enabled
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ContentItem>, EngineError> {
        let data = self.request(&query.effective_text(), &query.language).await?;

        Ok(data
            .pages
            .into_iter()
            .map(|raw| Self::map_page(raw, &query.language))
            .collect())
    }

    async fn probe(&self) -> Result<(), EngineError> {
        self.request("ping", "en").await.map(|_| ())
    }
}

#[derive(Debug, serde::Deserialize)]
struct WikiResponse {
    #[serde(default)]
    pages: Vec<WikiPage>,
}

#[derive(Debug, serde::Deserialize)]
struct WikiPage {
    id: u64,
    key: String,
    title: String,
    excerpt: Option<String>,
    description: Option<String>,
    thumbnail: Option<WikiThumbnail>,
}

#[derive(Debug, serde::Deserialize)]
struct WikiThumbnail {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_metadata() {
        let provider = EncyclopediaProvider::new(true, 10_000);
        assert_eq!(provider.id(), "wikipedia");
        assert_eq!(provider.icon(), "book");
        assert!(provider.is_configured());
    }

    #[test]
    fn test_disabled_provider_not_configured() {
        let provider = EncyclopediaProvider::new(false, 10_000);
        assert!(!provider.is_configured());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "pages": [
                {
                    "id": 9228,
                    "key": "Participatory_budgeting",
                    "title": "Participatory budgeting",
                    "excerpt": "<span class=\"searchmatch\">Participatory</span> budgeting",
                    "description": "democratic process",
                    "thumbnail": {"url": "//upload.wikimedia.org/thumb.jpg"}
                }
            ]
        }"#;

        let response: WikiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.pages.len(), 1);
    }

    #[test]
    fn test_map_page() {
        let raw = WikiPage {
            id: 9228,
            key: "Participatory_budgeting".to_string(),
            title: "Participatory budgeting".to_string(),
            excerpt: Some("<span class=\"searchmatch\">Participatory</span> budgeting".to_string()),
            description: None,
            thumbnail: Some(WikiThumbnail {
                url: "//upload.wikimedia.org/thumb.jpg".to_string(),
            }),
        };

        let item = EncyclopediaProvider::map_page(raw, "en");
        assert_eq!(item.id, "wikipedia-9228");
        assert_eq!(item.url, "https://en.wikipedia.org/wiki/Participatory_budgeting");
        assert_eq!(item.description, "Participatory budgeting");
        assert_eq!(
            item.thumbnail.as_deref(),
            Some("https://upload.wikimedia.org/thumb.jpg")
        );
        assert!(!item.stats.trending);
    }

    #[test]
    fn test_map_page_falls_back_to_description() {
        let raw = WikiPage {
            id: 1,
            key: "Town_hall".to_string(),
            title: "Town hall".to_string(),
            excerpt: None,
            description: Some("municipal building".to_string()),
            thumbnail: None,
        };

        let item = EncyclopediaProvider::map_page(raw, "pt");
        assert_eq!(item.description, "municipal building");
        assert_eq!(item.url, "https://pt.wikipedia.org/wiki/Town_hall");
        assert_eq!(item.language, "pt");
    }
}
