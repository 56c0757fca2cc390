// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deterministic fallback content
//!
//! Last-resort placeholders for collaborator surfaces (e.g., the digest
//! endpoint) when live aggregation yields nothing. Never part of the
//! orchestrator fan-out; the caller of the engine decides when to substitute.

use chrono::{DateTime, TimeZone, Utc};

use super::types::{ContentItem, ContentStats, ContentType};

const FALLBACK_SOURCE: &str = "fallback";

/// Fixed publish timestamp so repeated generations are byte-identical
fn fallback_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

/// Generates clearly-labeled placeholder items
pub struct FallbackGenerator;

impl FallbackGenerator {
    /// Deterministic placeholder set for a topic
    ///
    /// The same `(topic, count)` input always produces the same items.
    pub fn placeholders(topic: &str, count: usize) -> Vec<ContentItem> {
        let topic = if topic.trim().is_empty() {
            "community news"
        } else {
            topic.trim()
        };

        (0..count)
            .map(|n| ContentItem {
                id: format!("{}-{}", FALLBACK_SOURCE, n),
                title: format!("[Placeholder] {} — story {}", topic, n + 1),
                description: format!(
                    "Live sources for \"{}\" are currently unavailable. \
                     This is placeholder content.",
                    topic
                ),
                thumbnail: None,
                url: format!("https://example.invalid/fallback/{}", n),
                source: FALLBACK_SOURCE.to_string(),
                published_at: fallback_epoch(),
                stats: ContentStats::default(),
                content_type: ContentType::Article,
                platform: FALLBACK_SOURCE.to_string(),
                language: "en".to_string(),
                region: None,
                tags: vec!["placeholder".to_string()],
            })
            .collect()
    }
}
