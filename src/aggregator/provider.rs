// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Content provider trait definition

use async_trait::async_trait;

use super::types::{ContentItem, EngineError, SearchQuery};

/// Trait implemented by every external content source adapter
///
/// Adapters translate a generic [`SearchQuery`] into their upstream request
/// and normalize the reply into [`ContentItem`]s. They do not retry beyond
/// what is needed to surface a clean error; retry policy belongs to the
/// caller. Each adapter enforces its own request timeout so a hung upstream
/// cannot stall the whole fan-out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Stable provider identifier used as the registry key
    fn id(&self) -> &'static str;

    /// Human-readable name for dashboards
    fn display_name(&self) -> &'static str;

    /// Capability icon for dashboards
    fn icon(&self) -> &'static str;

    /// Whether required credentials/sources are present
    ///
    /// An unconfigured provider is registered as `inactive` and never
    /// queried or probed.
    fn is_configured(&self) -> bool;

    /// Search this provider and normalize the results
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ContentItem>, EngineError>;

    /// Lightweight existence/ping call used by the health monitor
    async fn probe(&self) -> Result<(), EngineError>;
}
