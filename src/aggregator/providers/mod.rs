// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider adapters
//!
//! One adapter per external content source. Each one owns its HTTP client
//! (with its own timeout), maps upstream fields onto [`ContentItem`] with
//! per-item defaulting, and classifies trending through the shared policy.

pub mod encyclopedia;
pub mod news;
pub mod regional;
pub mod social;
pub mod video;

pub use encyclopedia::EncyclopediaProvider;
pub use news::NewsProvider;
pub use regional::RegionalFeedProvider;
pub use social::SocialProvider;
pub use video::VideoProvider;

use crate::aggregator::types::EngineError;

/// Map a reqwest transport error onto the engine error model
pub(crate) fn request_error(
    provider: &'static str,
    timeout_ms: u64,
    err: reqwest::Error,
) -> EngineError {
    if err.is_timeout() {
        EngineError::Timeout {
            provider: provider.to_string(),
            timeout_ms,
        }
    } else {
        EngineError::ApiError {
            provider: provider.to_string(),
            status: 0,
            message: err.to_string(),
        }
    }
}

/// Strip HTML tags and decode the common entities from upstream snippets
pub(crate) fn strip_html(s: &str) -> String {
    let without_tags: String = s
        .split('<')
        .map(|part| {
            if let Some(pos) = part.find('>') {
                &part[pos + 1..]
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join("");

    without_tags
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_removes_tags() {
        assert_eq!(
            strip_html("<p>City <b>council</b> vote</p>"),
            "City council vote"
        );
    }

    #[test]
    fn test_strip_html_decodes_entities() {
        assert_eq!(strip_html("budget &amp; taxes"), "budget & taxes");
        assert_eq!(strip_html("it&#39;s fine"), "it's fine");
    }

    #[test]
    fn test_strip_html_plain_text_unchanged() {
        assert_eq!(strip_html("plain text"), "plain text");
    }
}
