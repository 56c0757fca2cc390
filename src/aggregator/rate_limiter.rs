// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Advisory per-provider rate limiting
//!
//! Not a token bucket: the limiter only remembers what upstream told us on a
//! throttling response, and stops obviously-futile calls until the reported
//! reset time has passed.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use super::types::EngineError;

/// Remaining-call counter and reset time reported by an upstream provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    pub remaining: u32,
    pub resets_at: DateTime<Utc>,
}

/// Per-provider rate limit bookkeeping
pub struct RateLimiter {
    states: RwLock<HashMap<String, RateLimitState>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Whether the provider may be queried in the current window
    ///
    /// A missing state or an elapsed reset time means the provider is
    /// unrestricted again; stale state is cleared on the spot.
    pub fn allow(&self, provider_id: &str) -> Result<bool, EngineError> {
        self.allow_at(provider_id, Utc::now())
    }

    /// Clock-injected variant of [`allow`](Self::allow), used by tests
    pub fn allow_at(
        &self,
        provider_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError> {
        let expired = {
            let states = self
                .states
                .read()
                .map_err(|_| EngineError::pipeline("rate limiter lock poisoned"))?;
            match states.get(provider_id) {
                None => return Ok(true),
                Some(state) if now > state.resets_at => true,
                Some(state) => return Ok(state.remaining > 0),
            }
        };

        if expired {
            let mut states = self
                .states
                .write()
                .map_err(|_| EngineError::pipeline("rate limiter lock poisoned"))?;
            // Re-check under the write lock; another caller may have raced us
            if states
                .get(provider_id)
                .map(|s| now > s.resets_at)
                .unwrap_or(false)
            {
                states.remove(provider_id);
            }
        }
        Ok(true)
    }

    /// Record an upstream throttling signal for the provider
    pub fn record_limit_hit(
        &self,
        provider_id: &str,
        remaining: u32,
        resets_at: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let mut states = self
            .states
            .write()
            .map_err(|_| EngineError::pipeline("rate limiter lock poisoned"))?;
        states.insert(
            provider_id.to_string(),
            RateLimitState {
                remaining,
                resets_at,
            },
        );
        Ok(())
    }

    /// Current state for a provider, if any window is being tracked
    pub fn state(&self, provider_id: &str) -> Result<Option<RateLimitState>, EngineError> {
        let states = self
            .states
            .read()
            .map_err(|_| EngineError::pipeline("rate limiter lock poisoned"))?;
        Ok(states.get(provider_id).copied())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_unknown_provider_is_allowed() {
        let limiter = RateLimiter::new();
        assert!(limiter.allow("youtube").unwrap());
    }

    #[test]
    fn test_exhausted_provider_is_blocked() {
        let limiter = RateLimiter::new();
        let resets = Utc::now() + Duration::minutes(5);
        limiter.record_limit_hit("youtube", 0, resets).unwrap();

        assert!(!limiter.allow("youtube").unwrap());
    }

    #[test]
    fn test_remaining_calls_are_allowed() {
        let limiter = RateLimiter::new();
        let resets = Utc::now() + Duration::minutes(5);
        limiter.record_limit_hit("newsapi", 3, resets).unwrap();

        assert!(limiter.allow("newsapi").unwrap());
    }

    #[test]
    fn test_elapsed_reset_clears_state() {
        let limiter = RateLimiter::new();
        let resets = Utc::now() - Duration::seconds(1);
        limiter.record_limit_hit("youtube", 0, resets).unwrap();

        assert!(limiter.allow("youtube").unwrap());
        // Stale state was discarded, not decremented further
        assert!(limiter.state("youtube").unwrap().is_none());
    }

    #[test]
    fn test_allow_at_future_clock() {
        let limiter = RateLimiter::new();
        let now = Utc::now();
        limiter
            .record_limit_hit("social", 0, now + Duration::minutes(10))
            .unwrap();

        assert!(!limiter.allow_at("social", now).unwrap());
        assert!(limiter
            .allow_at("social", now + Duration::minutes(11))
            .unwrap());
    }

    #[test]
    fn test_limits_are_per_provider() {
        let limiter = RateLimiter::new();
        let resets = Utc::now() + Duration::minutes(5);
        limiter.record_limit_hit("youtube", 0, resets).unwrap();

        assert!(!limiter.allow("youtube").unwrap());
        assert!(limiter.allow("newsapi").unwrap());
    }
}
