// ABOUTME: Food record models shared by every provider and the HTTP layer
// ABOUTME: FoodSource enum, unified NormalizedFood shape, and the StoredFood row shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Origin of a food record.
///
/// Every provider produces records tagged with exactly one source. New
/// providers extend this enum; the wire names are stable identifiers used in
/// API payloads and provider configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodSource {
    /// The user's own food database
    Internal,
    /// USDA FoodData Central
    FdcUsda,
}

impl FoodSource {
    /// Stable wire identifier for this source
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::FdcUsda => "fdc_usda",
        }
    }

    /// Parse a source from its wire identifier (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "internal" => Some(Self::Internal),
            "fdc_usda" => Some(Self::FdcUsda),
            _ => None,
        }
    }
}

impl std::fmt::Display for FoodSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified food record produced by every provider.
///
/// Nutrition values are per serving: `calories` in kcal, macros in grams.
/// The internal-database fields (`id`, `created_at`, `updated_at`,
/// `owner_id`) are populated only for [`FoodSource::Internal`] records;
/// `external_id` is set only for records from external providers. A record
/// never carries both meaningfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFood {
    /// Common name or title of the food item
    pub name: String,
    /// Manufacturer or brand name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Numeric value of a single serving (must be positive)
    pub serving_size: f64,
    /// Unit of measurement for the serving size
    pub serving_unit: String,
    /// Energy per serving in kilocalories
    pub calories: f64,
    /// Protein per serving in grams
    pub protein: f64,
    /// Total carbohydrates per serving in grams
    pub carbs: f64,
    /// Total fat per serving in grams
    pub fat: f64,
    /// Provider source of this record
    pub source: FoodSource,
    /// Identifier of this food in the external provider's system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Opaque provider-specific fields (e.g. FDC id, brand owner)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub provider_metadata: Map<String, Value>,
    /// Internal database id (internal records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Creation timestamp (internal records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp (internal records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Owner of this record (internal records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
}

/// Food row as held in the relational store.
///
/// This is the persistence shape the internal provider adapts from; see
/// [`crate::models::compat`] for the conversions to and from
/// [`NormalizedFood`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFood {
    /// Primary key
    pub id: i64,
    /// Food name
    pub name: String,
    /// Brand name, if any
    pub brand: Option<String>,
    /// Numeric serving size
    pub serving_size: f64,
    /// Serving unit
    pub serving_unit: String,
    /// Calories per serving (kcal)
    pub calories: f64,
    /// Protein per serving (g)
    pub protein: f64,
    /// Carbohydrates per serving (g)
    pub carbs: f64,
    /// Fat per serving (g)
    pub fat: f64,
    /// Owning user
    pub owner_id: Uuid,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Row last-update time
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_wire_names_round_trip() {
        for source in [FoodSource::Internal, FoodSource::FdcUsda] {
            assert_eq!(FoodSource::parse(source.as_str()), Some(source));
        }
        assert_eq!(FoodSource::parse("spoonacular"), None);
    }

    #[test]
    fn source_serializes_to_wire_name() {
        let json = serde_json::to_string(&FoodSource::FdcUsda).unwrap();
        assert_eq!(json, "\"fdc_usda\"");
    }

    #[test]
    fn normalized_food_omits_absent_internal_fields() {
        let food = NormalizedFood {
            name: "Oats".into(),
            brand: None,
            serving_size: 40.0,
            serving_unit: "g".into(),
            calories: 150.0,
            protein: 5.0,
            carbs: 27.0,
            fat: 2.5,
            source: FoodSource::FdcUsda,
            external_id: Some("171_287".into()),
            provider_metadata: Map::new(),
            id: None,
            created_at: None,
            updated_at: None,
            owner_id: None,
        };
        let json = serde_json::to_value(&food).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("owner_id").is_none());
        assert_eq!(json["external_id"], "171_287");
    }
}
