// ABOUTME: Core provider trait and shared request/response types for food data access
// ABOUTME: Defines the uniform capability contract every food source implements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! Shared request/response contract for food providers.
//!
//! The [`FoodProvider`] trait is the unified interface for searching food
//! data across heterogeneous sources. Providers accept standardized
//! [`SearchOptions`], return [`ProviderResponse`] with normalized records,
//! and surface every failure as a typed
//! [`ProviderError`](crate::errors::provider::ProviderError) — callers never
//! see a raw transport error.
//!
//! ## Adding a provider
//!
//! Implement [`FoodProvider`] for a struct holding the source's backend
//! handle and a [`ProviderSettings`] value. Convert the backend's native
//! records to [`NormalizedFood`] internally; validation and rate limiting
//! hooks have sensible defaults.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::provider::{ProviderError, ProviderResult};
use crate::models::food::{FoodSource, NormalizedFood};
use crate::pagination::{PageMetadata, MAX_PAGE_SIZE, MIN_PAGE_SIZE};

/// Sort direction accepted by provider backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Search options accepted by every provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchOptions {
    /// Free-text query; absent or blank means "browse"
    pub query: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<u32>,
    /// Items per page (default provider-specific)
    pub page_size: Option<u32>,
    /// Provider-specific filters, passed through opaquely
    pub filters: Option<Map<String, Value>>,
    /// Provider-specific sort field
    pub sort_by: Option<String>,
    /// Sort direction
    pub sort_order: Option<SortOrder>,
}

/// Rate limit quotas for providers with upstream caps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Requests allowed per rolling minute
    pub requests_per_minute: u32,
    /// Requests allowed per rolling day, when the upstream enforces one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_per_day: Option<u32>,
}

/// Runtime configuration carried by every provider.
///
/// Created at provider construction from defaults merged with caller
/// overrides; mutable at runtime through
/// [`FoodProvider::update_config`]. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Whether the provider participates in searches
    pub enabled: bool,
    /// Merge priority; higher wins ties and duplicate contests
    pub priority: i32,
    /// Upstream quota configuration, for providers that have one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitSettings>,
    /// Response cache TTL in milliseconds, for providers that cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_ms: Option<u64>,
}

impl ProviderSettings {
    /// Apply a partial update as a shallow merge
    pub fn apply(&mut self, patch: ProviderSettingsPatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(rate_limit) = patch.rate_limit {
            self.rate_limit = Some(rate_limit);
        }
        if let Some(cache_ttl_ms) = patch.cache_ttl_ms {
            self.cache_ttl_ms = Some(cache_ttl_ms);
        }
    }
}

/// Partial provider settings for runtime updates
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ProviderSettingsPatch {
    /// New enabled state
    pub enabled: Option<bool>,
    /// New priority
    pub priority: Option<i32>,
    /// New rate limit quotas
    pub rate_limit: Option<RateLimitSettings>,
    /// New cache TTL in milliseconds
    pub cache_ttl_ms: Option<u64>,
}

/// One provider's page of results for a single search call.
///
/// Ephemeral: constructed per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderResponse {
    /// Normalized records in the provider backend's own order
    pub foods: Vec<NormalizedFood>,
    /// Pagination metadata for this provider's view of the query
    pub pagination: PageMetadata,
    /// The provider that produced this page
    pub source: FoodSource,
}

impl ProviderResponse {
    /// An empty page, used when a provider fails or has nothing to return
    #[must_use]
    pub fn empty(source: FoodSource, page: u32, page_size: u32) -> Self {
        Self {
            foods: Vec::new(),
            pagination: PageMetadata::empty(page, page_size),
            source,
        }
    }
}

/// Validate the paging fields of a search request.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidPageSize`] or
/// [`ProviderError::InvalidPageNumber`] when the request is out of bounds.
pub fn validate_search_options(source: FoodSource, options: &SearchOptions) -> ProviderResult<()> {
    if let Some(size) = options.page_size {
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&size) {
            return Err(ProviderError::InvalidPageSize {
                provider: source,
                size,
            });
        }
    }
    if let Some(page) = options.page {
        if page < 1 {
            return Err(ProviderError::InvalidPageNumber {
                provider: source,
                page,
            });
        }
    }
    Ok(())
}

/// Core food data provider trait.
///
/// All implementations must be `Send + Sync` for concurrent fan-out across
/// async tasks. No provider method mutates another provider's state.
#[async_trait]
pub trait FoodProvider: Send + Sync {
    /// The source this provider serves
    fn source(&self) -> FoodSource;

    /// Snapshot of the current provider configuration
    fn config(&self) -> ProviderSettings;

    /// Shallow-merge a partial configuration update
    fn update_config(&self, patch: ProviderSettingsPatch);

    /// Whether the provider participates in searches
    fn is_enabled(&self) -> bool {
        self.config().enabled
    }

    /// Merge priority; higher wins ties and duplicate contests
    fn priority(&self) -> i32 {
        self.config().priority
    }

    /// Check and register quota usage before an outbound call.
    ///
    /// Default is a no-op for providers without upstream quotas.
    ///
    /// # Errors
    ///
    /// Providers with quotas fail with a rate limit error when a window is
    /// exhausted.
    async fn check_rate_limit(&self) -> ProviderResult<()> {
        Ok(())
    }

    /// Search this provider for foods matching the options.
    ///
    /// # Errors
    ///
    /// All failures are translated to a typed
    /// [`ProviderError`](crate::errors::provider::ProviderError) at the
    /// provider boundary.
    async fn search_foods(&self, options: &SearchOptions) -> ProviderResult<ProviderResponse>;

    /// Fetch one food by its id in the provider's system.
    ///
    /// Returns `Ok(None)` when the id is well-formed but absent upstream.
    ///
    /// # Errors
    ///
    /// Fails with a typed provider error on transport or backend failure.
    async fn get_food_by_id(&self, id: &str) -> ProviderResult<Option<NormalizedFood>>;
}
