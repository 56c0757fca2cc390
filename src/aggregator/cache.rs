// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! TTL-based result caching
//!
//! One `TtlCache` instance per namespace: search results (5 min default) and
//! topic aggregates (15 min default) are kept in separate instances with
//! independent TTLs. Eviction is lazy: an expired entry is removed by the
//! `get` that observes it, there is no background sweep.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::types::{EngineError, SearchQuery};

/// TTL cache with bounded capacity and lazy expiry
pub struct TtlCache<V: Clone> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    max_entries: usize,
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Cache statistics for introspection
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Total entries in cache
    pub total: usize,
    /// Expired entries not yet evicted
    pub expired: usize,
    /// Maximum cache capacity
    pub max: usize,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries,
        }
    }

    /// Convenience constructor with a TTL in whole seconds
    pub fn with_ttl_secs(ttl_secs: u64, max_entries: usize) -> Self {
        Self::new(Duration::from_secs(ttl_secs), max_entries)
    }

    /// Get a cached value; an expired entry behaves as a miss and is removed
    pub fn get(&self, key: &str) -> Result<Option<V>, EngineError> {
        {
            let entries = self
                .entries
                .read()
                .map_err(|_| EngineError::pipeline("cache lock poisoned"))?;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                    return Ok(Some(entry.value.clone()))
                }
                Some(_) => {}
            }
        }

        // Expired: evict under the write lock, re-checking freshness in case
        // a concurrent put replaced the entry since we released the read lock
        let mut entries = self
            .entries
            .write()
            .map_err(|_| EngineError::pipeline("cache lock poisoned"))?;
        if let Some(entry) = entries.get(key) {
            if entry.inserted_at.elapsed() <= self.ttl {
                return Ok(Some(entry.value.clone()));
            }
            entries.remove(key);
        }
        Ok(None)
    }

    /// Insert a value, evicting the oldest entry at capacity
    pub fn put(&self, key: &str, value: V) -> Result<(), EngineError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| EngineError::pipeline("cache lock poisoned"))?;

        if entries.len() >= self.max_entries && !entries.contains_key(key) {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Drop all entries
    pub fn clear(&self) -> Result<(), EngineError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| EngineError::pipeline("cache lock poisoned"))?;
        entries.clear();
        Ok(())
    }

    pub fn stats(&self) -> Result<CacheStats, EngineError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| EngineError::pipeline("cache lock poisoned"))?;
        let total = entries.len();
        let expired = entries
            .values()
            .filter(|e| e.inserted_at.elapsed() > self.ttl)
            .count();
        Ok(CacheStats {
            total,
            expired,
            max: self.max_entries,
        })
    }
}

/// Canonical cache key for a search query
///
/// Two queries that differ only in platform ordering, text casing, or
/// surrounding whitespace produce the same key.
pub fn query_key(query: &SearchQuery) -> String {
    let mut platforms = query.platforms.clone();
    platforms.sort();

    let location = query.location.as_deref().unwrap_or("-");
    format!(
        "{}|{:?}|{}|{}|{}",
        query.text.trim().to_lowercase(),
        query.scope,
        platforms.join(","),
        query.language,
        location,
    )
}
