// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared trending classification
//!
//! One policy instance is injected into every adapter so merge-ranking stays
//! comparable across providers by construction.

use chrono::{DateTime, Duration, Utc};

use super::types::ContentStats;

/// Recency/engagement rule for marking an item as trending
#[derive(Debug, Clone, Copy)]
pub struct TrendingPolicy {
    /// Items published within this many hours are trending
    pub recent_hours: i64,
    /// Older items still qualify above this engagement total
    pub min_engagement: u64,
}

impl TrendingPolicy {
    pub fn new(recent_hours: i64, min_engagement: u64) -> Self {
        Self {
            recent_hours,
            min_engagement,
        }
    }

    /// Classify an item given its publish time and engagement counters
    pub fn classify(&self, published_at: DateTime<Utc>, stats: &ContentStats) -> bool {
        self.classify_at(published_at, stats, Utc::now())
    }

    /// Clock-injected variant of [`classify`](Self::classify)
    pub fn classify_at(
        &self,
        published_at: DateTime<Utc>,
        stats: &ContentStats,
        now: DateTime<Utc>,
    ) -> bool {
        if now.signed_duration_since(published_at) <= Duration::hours(self.recent_hours) {
            return true;
        }
        self.min_engagement > 0 && stats.engagement() >= self.min_engagement
    }
}

impl Default for TrendingPolicy {
    fn default() -> Self {
        Self {
            recent_hours: 24,
            min_engagement: 10_000,
        }
    }
}
