// ABOUTME: Core types and utilities for the Forkful food search platform
// ABOUTME: Foundation crate with domain models, provider errors, pagination, and similarity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! Core types for the Forkful food search platform.
//!
//! This crate holds everything shared between the provider implementations and
//! the HTTP layer: the unified food record shape, the provider error taxonomy,
//! page-based pagination metadata, and the name-similarity utilities used for
//! cross-provider deduplication.

/// Provider error taxonomy
pub mod errors;
/// Domain models (foods, sources, storage shapes)
pub mod models;
/// Page-based pagination requests and metadata
pub mod pagination;
/// Name similarity and cleanup utilities shared by all dedup sites
pub mod similarity;

pub use errors::provider::{ProviderError, ProviderResult};
pub use models::compat::{
    is_external_food, normalized_to_stored, source_display_name, stored_to_normalized,
};
pub use models::food::{FoodSource, NormalizedFood, StoredFood};
pub use pagination::{PageMetadata, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
pub use similarity::{clean_food_name, food_name_similarity};
