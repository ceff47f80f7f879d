// ABOUTME: Food data provider implementations for the internal database and USDA FDC
// ABOUTME: Core provider trait, food store abstraction, aggregator, and shared HTTP plumbing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! Food data provider implementations and the aggregation service.
//!
//! This crate provides the unified provider system for querying food data
//! sources: the user's own food database and the USDA FoodData Central API.
//! The [`aggregator::FoodAggregator`] fans out to every enabled provider
//! concurrently, then merges, deduplicates, sorts, and paginates the
//! combined results.

// Re-export forkful-core modules so provider code can use `crate::errors::*` etc.
pub use forkful_core::errors;
pub use forkful_core::models;
pub use forkful_core::pagination;
pub use forkful_core::similarity;

/// Aggregation service orchestrating all providers
pub mod aggregator;
/// Core provider trait and shared request/response types
pub mod core;
/// USDA FoodData Central provider and API client
pub mod fdc;
/// Shared HTTP client for provider API calls
pub mod http_client;
/// Internal-database provider
pub mod internal;
/// Retry helper for transient transport failures
pub mod retry;
/// Food storage abstraction backing the internal provider
pub mod store;

// Re-export key types for convenience

pub use aggregator::{
    AggregatedResponse, AggregatedSearchOptions, AggregationStats, AggregatorConfig,
    DeduplicationConfig, FoodAggregator, MergeStrategy, AGGREGATED_SOURCE,
};
pub use self::core::{
    FoodProvider, ProviderResponse, ProviderSettings, ProviderSettingsPatch, RateLimitSettings,
    SearchOptions, SortOrder,
};
pub use fdc::client::{FdcClient, FdcClientConfig, FdcSearchParams};
pub use fdc::provider::FdcFoodProvider;
pub use fdc::rate_limit::SlidingWindowLimiter;
pub use forkful_core::errors::provider::{ProviderError, ProviderResult};
pub use http_client::{initialize_shared_client, shared_client};
pub use internal::InternalFoodProvider;
pub use retry::{send_with_retry, RetryConfig};
pub use store::{FoodDraft, FoodQuery, FoodStore, MemoryFoodStore, StoreError};
