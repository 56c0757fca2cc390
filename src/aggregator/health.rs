// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider health monitoring
//!
//! Runs on its own interval, independent of search traffic. Each tick probes
//! every configured provider concurrently and folds the outcomes into the
//! registry. The status decision itself is a pure function so it can be
//! tested without timers or network.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::provider::ContentProvider;
use super::registry::ProviderRegistry;
use super::types::ProviderStatus;

/// Result of one probe against one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub provider_id: String,
    pub healthy: bool,
}

/// Periodic prober that keeps registry status current
pub struct HealthMonitor {
    registry: Arc<ProviderRegistry>,
    providers: Vec<Arc<dyn ContentProvider>>,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        providers: Vec<Arc<dyn ContentProvider>>,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            providers,
            interval,
        }
    }

    /// Run the monitor until the task is dropped
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        // The first tick of a tokio interval fires immediately, which is the
        // behavior we want at startup
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// Probe all configured providers once and apply the outcomes
    ///
    /// Never fails: probe errors degrade the provider to `error`, registry
    /// faults are logged and skipped so one bad tick cannot kill the loop.
    pub async fn tick(&self) {
        let probes = self
            .providers
            .iter()
            .filter(|p| p.is_configured())
            .map(|p| async move {
                let healthy = match p.probe().await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Health probe failed for {}: {}", p.id(), e);
                        false
                    }
                };
                ProbeOutcome {
                    provider_id: p.id().to_string(),
                    healthy,
                }
            });

        let outcomes = futures::future::join_all(probes).await;

        for (id, status) in Self::decide(&outcomes) {
            debug!("Health monitor: {} -> {:?}", id, status);
            if let Err(e) = self.registry.set_status(&id, status) {
                warn!("Health monitor could not update {}: {}", id, e);
            }
        }
    }

    /// Pure status decision: probe outcomes in, status updates out
    pub fn decide(outcomes: &[ProbeOutcome]) -> Vec<(String, ProviderStatus)> {
        outcomes
            .iter()
            .map(|o| {
                let status = if o.healthy {
                    ProviderStatus::Active
                } else {
                    ProviderStatus::Error
                };
                (o.provider_id.clone(), status)
            })
            .collect()
    }
}
