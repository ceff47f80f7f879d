// ABOUTME: Conversions between the relational food row and the unified food shape
// ABOUTME: Round-trip safe for internal records; rejects external records on the way back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! Compatibility conversions between [`StoredFood`] and [`NormalizedFood`].
//!
//! Converting a stored row to the unified shape and back yields the original
//! row, timestamps included; timestamps are carried through, never
//! regenerated. The reverse conversion only applies to internal-sourced
//! records.

use serde_json::{Map, Value};

use crate::errors::provider::{ProviderError, ProviderResult};
use crate::models::food::{FoodSource, NormalizedFood, StoredFood};

/// Metadata key carrying the internal database id
pub const METADATA_INTERNAL_ID: &str = "internal_id";

/// Convert a stored row into the unified food shape
#[must_use]
pub fn stored_to_normalized(food: &StoredFood) -> NormalizedFood {
    let mut provider_metadata = Map::new();
    provider_metadata.insert(METADATA_INTERNAL_ID.into(), Value::from(food.id));

    NormalizedFood {
        name: food.name.clone(),
        brand: food.brand.clone(),
        serving_size: food.serving_size,
        serving_unit: food.serving_unit.clone(),
        calories: food.calories,
        protein: food.protein,
        carbs: food.carbs,
        fat: food.fat,
        source: FoodSource::Internal,
        external_id: None,
        provider_metadata,
        id: Some(food.id),
        created_at: Some(food.created_at),
        updated_at: Some(food.updated_at),
        owner_id: Some(food.owner_id),
    }
}

/// Convert a unified food back into the storage row shape.
///
/// # Errors
///
/// Returns [`ProviderError::ExternalFoodUpdate`] when the record is not
/// internal-sourced, and [`ProviderError::MissingId`] when it carries no
/// database id or owner.
pub fn normalized_to_stored(food: &NormalizedFood) -> ProviderResult<StoredFood> {
    if food.source != FoodSource::Internal {
        return Err(ProviderError::ExternalFoodUpdate {
            provider: food.source,
        });
    }

    let (Some(id), Some(owner_id), Some(created_at), Some(updated_at)) =
        (food.id, food.owner_id, food.created_at, food.updated_at)
    else {
        return Err(ProviderError::MissingId {
            provider: FoodSource::Internal,
        });
    };

    Ok(StoredFood {
        id,
        name: food.name.clone(),
        brand: food.brand.clone(),
        serving_size: food.serving_size,
        serving_unit: food.serving_unit.clone(),
        calories: food.calories,
        protein: food.protein,
        carbs: food.carbs,
        fat: food.fat,
        owner_id,
        created_at,
        updated_at,
    })
}

/// Whether a food record came from an external source
#[must_use]
pub fn is_external_food(food: &NormalizedFood) -> bool {
    food.source != FoodSource::Internal
}

/// Human-readable name for a food source
#[must_use]
pub const fn source_display_name(source: FoodSource) -> &'static str {
    match source {
        FoodSource::Internal => "Personal database",
        FoodSource::FdcUsda => "USDA food database",
    }
}
