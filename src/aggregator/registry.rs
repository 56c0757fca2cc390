// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider registry
//!
//! Single source of truth for provider status. Only the health monitor and
//! the orchestrator's failure handling write status; everything else reads.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use super::types::{EngineError, Provider, ProviderStatus};

/// Concurrent map of registered providers, keyed by provider id
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a provider at startup; replaces any previous record
    pub fn register(&self, provider: Provider) -> Result<(), EngineError> {
        let mut providers = self
            .providers
            .write()
            .map_err(|_| EngineError::pipeline("provider registry lock poisoned"))?;
        providers.insert(provider.id.clone(), provider);
        Ok(())
    }

    /// All registered providers
    pub fn list(&self) -> Result<Vec<Provider>, EngineError> {
        let providers = self
            .providers
            .read()
            .map_err(|_| EngineError::pipeline("provider registry lock poisoned"))?;
        let mut all: Vec<Provider> = providers.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    /// Providers with status `active`
    pub fn list_active(&self) -> Result<Vec<Provider>, EngineError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| p.status == ProviderStatus::Active)
            .collect())
    }

    /// Look up one provider by id
    pub fn get(&self, id: &str) -> Result<Option<Provider>, EngineError> {
        let providers = self
            .providers
            .read()
            .map_err(|_| EngineError::pipeline("provider registry lock poisoned"))?;
        Ok(providers.get(id).cloned())
    }

    /// Update a provider's status; unknown ids are ignored
    pub fn set_status(&self, id: &str, status: ProviderStatus) -> Result<(), EngineError> {
        let mut providers = self
            .providers
            .write()
            .map_err(|_| EngineError::pipeline("provider registry lock poisoned"))?;
        if let Some(provider) = providers.get_mut(id) {
            provider.status = status;
            provider.last_updated = Utc::now();
        }
        Ok(())
    }

    /// Record upstream quota information reported by an adapter
    pub fn set_quota(
        &self,
        id: &str,
        remaining: u32,
        resets_at: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let mut providers = self
            .providers
            .write()
            .map_err(|_| EngineError::pipeline("provider registry lock poisoned"))?;
        if let Some(provider) = providers.get_mut(id) {
            provider.remaining_quota = Some(remaining);
            provider.quota_resets_at = Some(resets_at);
            provider.last_updated = Utc::now();
        }
        Ok(())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(ids: &[(&str, ProviderStatus)]) -> ProviderRegistry {
        let registry = ProviderRegistry::new();
        for (id, status) in ids {
            registry
                .register(Provider::new(id, id, "globe", *status))
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_register_and_get() {
        let registry = registry_with(&[("youtube", ProviderStatus::Active)]);
        let provider = registry.get("youtube").unwrap().unwrap();
        assert_eq!(provider.id, "youtube");
        assert_eq!(provider.status, ProviderStatus::Active);
    }

    #[test]
    fn test_get_unknown_provider() {
        let registry = ProviderRegistry::new();
        assert!(registry.get("nope").unwrap().is_none());
    }

    #[test]
    fn test_list_is_sorted() {
        let registry = registry_with(&[
            ("wikipedia", ProviderStatus::Active),
            ("newsapi", ProviderStatus::Inactive),
            ("youtube", ProviderStatus::Active),
        ]);
        let ids: Vec<String> = registry.list().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["newsapi", "wikipedia", "youtube"]);
    }

    #[test]
    fn test_list_active_filters_status() {
        let registry = registry_with(&[
            ("youtube", ProviderStatus::Active),
            ("newsapi", ProviderStatus::Error),
            ("social", ProviderStatus::Inactive),
        ]);
        let active = registry.list_active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "youtube");
    }

    #[test]
    fn test_set_status_updates_timestamp() {
        let registry = registry_with(&[("youtube", ProviderStatus::Active)]);
        let before = registry.get("youtube").unwrap().unwrap().last_updated;

        registry.set_status("youtube", ProviderStatus::Error).unwrap();
        let provider = registry.get("youtube").unwrap().unwrap();
        assert_eq!(provider.status, ProviderStatus::Error);
        assert!(provider.last_updated >= before);
    }

    #[test]
    fn test_set_status_unknown_id_is_noop() {
        let registry = ProviderRegistry::new();
        assert!(registry.set_status("ghost", ProviderStatus::Error).is_ok());
    }

    #[test]
    fn test_set_quota() {
        let registry = registry_with(&[("newsapi", ProviderStatus::Active)]);
        let resets = Utc::now() + chrono::Duration::minutes(10);
        registry.set_quota("newsapi", 0, resets).unwrap();

        let provider = registry.get("newsapi").unwrap().unwrap();
        assert_eq!(provider.remaining_quota, Some(0));
        assert_eq!(provider.quota_resets_at, Some(resets));
    }
}
