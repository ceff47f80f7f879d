// ABOUTME: Structured error types for food provider operations
// ABOUTME: The sole typed error leaving a provider boundary, with stable codes and HTTP mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! Typed errors for provider operations.
//!
//! Every failure crossing a provider boundary is one of these variants;
//! callers above the provider layer never see a raw transport or parse
//! error. Each variant exposes a stable string [`code`](ProviderError::code)
//! used in API payloads and an HTTP status mapping for the route layer.

use thiserror::Error;

use crate::models::food::FoodSource;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// The sole typed error leaving a food provider boundary
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Requested page size outside the accepted range
    #[error("{provider}: page size must be between 1 and 200, got {size}")]
    InvalidPageSize {
        /// Provider that rejected the request
        provider: FoodSource,
        /// Requested page size
        size: u32,
    },

    /// Requested page number below 1
    #[error("{provider}: page number must be greater than 0, got {page}")]
    InvalidPageNumber {
        /// Provider that rejected the request
        provider: FoodSource,
        /// Requested page number
        page: u32,
    },

    /// Per-minute request quota exhausted before the call was attempted
    #[error("{provider}: rate limit exceeded, too many requests per minute (limit {limit})")]
    RateLimitMinute {
        /// Provider whose quota was exhausted
        provider: FoodSource,
        /// Configured per-minute limit
        limit: u32,
    },

    /// Per-hour request quota exhausted before the call was attempted
    #[error("{provider}: rate limit exceeded, too many requests per hour (limit {limit})")]
    RateLimitHour {
        /// Provider whose quota was exhausted
        provider: FoodSource,
        /// Configured per-hour limit
        limit: u32,
    },

    /// External provider cannot initialize without an API key
    #[error("{provider}: API key is required but not configured")]
    MissingApiKey {
        /// Provider missing its key
        provider: FoodSource,
    },

    /// Upstream API returned a non-2xx response
    #[error("{provider}: upstream request failed with HTTP {status}")]
    Http {
        /// Provider whose upstream failed
        provider: FoodSource,
        /// HTTP status code returned by the upstream
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// Search operation failed for a reason other than an upstream status
    #[error("{provider}: search failed: {message}")]
    Search {
        /// Provider that failed
        provider: FoodSource,
        /// Failure description
        message: String,
    },

    /// Get-by-id operation failed for a reason other than an upstream status
    #[error("{provider}: get food by id failed: {message}")]
    GetById {
        /// Provider that failed
        provider: FoodSource,
        /// Failure description
        message: String,
    },

    /// The merge/sort/paginate step of an aggregated search failed
    #[error("aggregated search failed: {message}")]
    Aggregation {
        /// Failure description
        message: String,
    },

    /// Requested provider is not registered or not enabled
    #[error("{provider}: provider is not available")]
    NotAvailable {
        /// The unavailable provider
        provider: FoodSource,
    },

    /// Attempted to persist a change to a record from an external source
    #[error("{provider}: cannot update or delete a food from an external source")]
    ExternalFoodUpdate {
        /// Source of the rejected record
        provider: FoodSource,
    },

    /// Attempted to import a food that is already internal
    #[error("food {id} is already in the internal database")]
    AlreadyInternal {
        /// Internal id of the record
        id: i64,
    },

    /// A persistence operation requires an id the record does not carry
    #[error("{provider}: food id is required for this operation")]
    MissingId {
        /// Provider that rejected the record
        provider: FoodSource,
    },

    /// Supplied id does not parse as a valid identifier for the provider
    #[error("{provider}: invalid food id format: {id}")]
    InvalidId {
        /// Provider that rejected the id
        provider: FoodSource,
        /// The offending id
        id: String,
    },

    /// Storage backend failure behind the internal provider
    #[error("{provider}: storage failure: {message}")]
    Store {
        /// Provider whose storage failed
        provider: FoodSource,
        /// Failure description
        message: String,
    },
}

impl ProviderError {
    /// Stable error code for API payloads.
    ///
    /// Upstream HTTP failures encode the status into the code
    /// (`HTTP_404`, `HTTP_429`, ...).
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::InvalidPageSize { .. } => "INVALID_PAGE_SIZE".into(),
            Self::InvalidPageNumber { .. } => "INVALID_PAGE_NUMBER".into(),
            Self::RateLimitMinute { .. } => "RATE_LIMIT_MINUTE".into(),
            Self::RateLimitHour { .. } => "RATE_LIMIT_HOUR".into(),
            Self::MissingApiKey { .. } => "MISSING_API_KEY".into(),
            Self::Http { status, .. } => format!("HTTP_{status}"),
            Self::Search { .. } => "SEARCH_ERROR".into(),
            Self::GetById { .. } => "GET_BY_ID_ERROR".into(),
            Self::Aggregation { .. } => "AGGREGATION_ERROR".into(),
            Self::NotAvailable { .. } => "PROVIDER_NOT_AVAILABLE".into(),
            Self::ExternalFoodUpdate { .. } => "EXTERNAL_FOOD_UPDATE".into(),
            Self::AlreadyInternal { .. } => "ALREADY_INTERNAL".into(),
            Self::MissingId { .. } => "MISSING_ID".into(),
            Self::InvalidId { .. } => "INVALID_ID".into(),
            Self::Store { .. } => "STORE_ERROR".into(),
        }
    }

    /// The provider this error belongs to, when one applies
    #[must_use]
    pub const fn provider(&self) -> Option<FoodSource> {
        match self {
            Self::InvalidPageSize { provider, .. }
            | Self::InvalidPageNumber { provider, .. }
            | Self::RateLimitMinute { provider, .. }
            | Self::RateLimitHour { provider, .. }
            | Self::MissingApiKey { provider }
            | Self::Http { provider, .. }
            | Self::Search { provider, .. }
            | Self::GetById { provider, .. }
            | Self::NotAvailable { provider }
            | Self::ExternalFoodUpdate { provider }
            | Self::MissingId { provider }
            | Self::InvalidId { provider, .. }
            | Self::Store { provider, .. } => Some(*provider),
            Self::Aggregation { .. } | Self::AlreadyInternal { .. } => None,
        }
    }

    /// HTTP status the route layer should answer with for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidPageSize { .. }
            | Self::InvalidPageNumber { .. }
            | Self::MissingId { .. }
            | Self::InvalidId { .. } => 400,
            Self::AlreadyInternal { .. } | Self::ExternalFoodUpdate { .. } => 409,
            Self::RateLimitMinute { .. } | Self::RateLimitHour { .. } => 429,
            Self::Http { .. } => 502,
            Self::MissingApiKey { .. } | Self::NotAvailable { .. } => 503,
            Self::Search { .. }
            | Self::GetById { .. }
            | Self::Aggregation { .. }
            | Self::Store { .. } => 500,
        }
    }
}
