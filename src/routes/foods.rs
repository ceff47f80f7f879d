// ABOUTME: Food search route handlers over the aggregation service
// ABOUTME: Aggregated search endpoint and provider availability listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! Food search routes.
//!
//! `POST /foods/search` runs an aggregated search across every requested
//! provider; `GET /foods/providers` reports which sources are available and
//! enabled. Partial results are preferred over total failure: a misbehaving
//! provider is absorbed by the aggregator and simply missing from the
//! response's source breakdown.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use forkful_core::{source_display_name, FoodSource};
use forkful_providers::aggregator::{AggregatedResponse, AggregatedSearchOptions, MergeStrategy};
use forkful_providers::core::SearchOptions;

use crate::errors::AppResult;
use crate::state::ServerResources;

/// Hard cap on the page size accepted by the search endpoint
const MAX_SEARCH_PAGE_SIZE: u32 = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /foods/search`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearchRequest {
    /// Free-text query
    #[serde(default)]
    pub query: Option<String>,
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (at most 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Limit the search to specific sources
    #[serde(default)]
    pub providers: Option<Vec<FoodSource>>,
    /// Whether near-duplicates are collapsed
    #[serde(default = "default_true")]
    pub enable_deduplication: bool,
    /// Result ordering rule override
    #[serde(default)]
    pub merge_strategy: Option<MergeStrategy>,
}

const fn default_page() -> u32 {
    1
}

const fn default_page_size() -> u32 {
    25
}

const fn default_true() -> bool {
    true
}

/// One entry of the provider status listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatusEntry {
    /// Whether the provider is registered at all
    pub available: bool,
    /// Whether the provider participates in searches
    pub enabled: bool,
    /// Human-readable source description
    pub description: &'static str,
    /// Whether the provider needs an API key to initialize
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_api_key: bool,
}

/// Response of `GET /foods/providers`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersResponse {
    /// Sources with a registered provider
    pub available_providers: Vec<FoodSource>,
    /// Status per known source
    pub provider_status: HashMap<FoodSource, ProviderStatusEntry>,
    /// Number of available providers
    pub total_providers: usize,
}

// ============================================================================
// Routes
// ============================================================================

/// Food route handlers
pub struct FoodRoutes;

impl FoodRoutes {
    /// Create the food search and provider status routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/foods/search", post(search_foods))
            .route("/foods/providers", get(list_providers))
            .with_state(resources)
    }
}

/// `POST /foods/search` — aggregated food search
async fn search_foods(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<FoodSearchRequest>,
) -> AppResult<Json<AggregatedResponse>> {
    if request.page_size > MAX_SEARCH_PAGE_SIZE {
        return Err(crate::errors::AppError::invalid_input(
            "Page size cannot exceed 100",
        ));
    }

    let options = AggregatedSearchOptions {
        search: SearchOptions {
            query: request.query,
            page: Some(request.page),
            page_size: Some(request.page_size),
            ..SearchOptions::default()
        },
        providers: request.providers,
        provider_priority: None,
        enable_deduplication: Some(request.enable_deduplication),
        merge_strategy: request.merge_strategy,
    };

    let response = resources.aggregator.search_foods(&options).await?;
    Ok(Json(response))
}

/// `GET /foods/providers` — provider availability and status
async fn list_providers(
    State(resources): State<Arc<ServerResources>>,
) -> Json<ProvidersResponse> {
    let available = resources.aggregator.available_providers();
    let enabled = resources.aggregator.enabled_providers();

    let mut provider_status = HashMap::new();
    for source in [FoodSource::Internal, FoodSource::FdcUsda] {
        provider_status.insert(
            source,
            ProviderStatusEntry {
                available: available.contains(&source),
                enabled: enabled.contains(&source),
                description: source_display_name(source),
                requires_api_key: source == FoodSource::FdcUsda,
            },
        );
    }

    let mut available_providers = available;
    available_providers.sort_by_key(|source| source.as_str());
    let total_providers = available_providers.len();

    Json(ProvidersResponse {
        available_providers,
        provider_status,
        total_providers,
    })
}
