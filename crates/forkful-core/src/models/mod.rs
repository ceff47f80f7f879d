// ABOUTME: Domain model module organization for food records and conversions
// ABOUTME: Unified food shape, storage row shape, and compatibility helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

/// Conversions between the storage row shape and the unified food shape
pub mod compat;
/// Food source types and record shapes
pub mod food;

pub use compat::{is_external_food, normalized_to_stored, source_display_name, stored_to_normalized};
pub use food::{FoodSource, NormalizedFood, StoredFood};
