// ABOUTME: USDA FoodData Central provider module organization
// ABOUTME: Wire models, rate limiter, REST client, and the provider adapter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

/// REST client for the FoodData Central API
pub mod client;
/// Wire-format DTOs for the FDC API
pub mod models;
/// Provider adapter translating FDC payloads to normalized foods
pub mod provider;
/// Sliding-window rate limiter guarding outbound FDC calls
pub mod rate_limit;

pub use client::{FdcClient, FdcClientConfig, FdcSearchParams, FDC_BASE_URL, MAX_IDS_PER_BATCH};
pub use models::{FdcFood, FdcFoodPortion, FdcNutrientEntry, FdcSearchResponse};
pub use provider::FdcFoodProvider;
pub use rate_limit::SlidingWindowLimiter;
