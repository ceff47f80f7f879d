// ABOUTME: Wire-format DTOs for the USDA FoodData Central API
// ABOUTME: Search request/response shapes and food payloads with dual-shape nutrient entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use serde::{Deserialize, Serialize};

/// Body of `POST {base}/foods/search`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FdcSearchRequest {
    /// Free-text query
    pub query: String,
    /// Data types to include (e.g. "Foundation", "SR Legacy", "Branded")
    pub data_type: Vec<String>,
    /// Page size, capped at the upstream maximum of 200
    pub page_size: u32,
    /// 1-based page number
    pub page_number: u32,
    /// Upstream sort field
    pub sort_by: String,
    /// Sort direction ("asc" or "desc")
    pub sort_order: String,
    /// Brand owner filter (empty for no filter)
    pub brand_owner: String,
}

/// Response of `POST {base}/foods/search`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdcSearchResponse {
    /// Matching foods
    #[serde(default)]
    pub foods: Vec<FdcFood>,
    /// Total matches across all pages
    #[serde(default)]
    pub total_hits: u64,
    /// Page this response covers
    #[serde(default)]
    pub current_page: u32,
    /// Total pages for the query
    #[serde(default)]
    pub total_pages: u64,
}

/// One food as returned by the FDC API.
///
/// Both the search and detail endpoints deserialize into this shape; fields
/// the endpoint does not send default to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdcFood {
    /// FoodData Central id
    pub fdc_id: u64,
    /// Raw food description
    #[serde(default)]
    pub description: String,
    /// Data type (e.g. "Branded", "SR Legacy")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Brand owner, for branded foods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_owner: Option<String>,
    /// Brand name, for branded foods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    /// Ingredient list, for branded foods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    /// Explicit serving size, when the upstream declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    /// Unit for the explicit serving size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size_unit: Option<String>,
    /// Variable-length nutrient array
    #[serde(default)]
    pub food_nutrients: Vec<FdcNutrientEntry>,
    /// Household portions with gram weights
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_portions: Option<Vec<FdcFoodPortion>>,
}

/// One nutrient entry.
///
/// The search endpoint sends a flat shape (`nutrientId`, `value`,
/// `unitName`); the detail endpoint nests the nutrient identity under
/// `nutrient` with the amount alongside. Both deserialize here and the
/// accessors resolve whichever shape is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdcNutrientEntry {
    /// Nutrient number (flat search shape)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrient_id: Option<u32>,
    /// Nutrient name (flat search shape)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrient_name: Option<String>,
    /// Unit name (flat search shape)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    /// Amount per 100 g (flat search shape)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Nutrient identity (nested detail shape)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrient: Option<FdcNutrientInfo>,
    /// Amount per 100 g (nested detail shape)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl FdcNutrientEntry {
    /// Nutrient number, from whichever shape is present
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        self.nutrient_id
            .or_else(|| self.nutrient.as_ref().map(|info| info.id))
    }

    /// Amount, from whichever shape is present; missing amounts are zero
    #[must_use]
    pub fn quantity(&self) -> f64 {
        self.value.or(self.amount).unwrap_or(0.0)
    }

    /// Unit name, from whichever shape is present
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit_name
            .as_deref()
            .or_else(|| self.nutrient.as_ref().and_then(|info| info.unit_name.as_deref()))
    }
}

/// Nutrient identity in the nested detail shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdcNutrientInfo {
    /// Nutrient number
    pub id: u32,
    /// Nutrient name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
}

/// One household portion with its gram weight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdcFoodPortion {
    /// Portion id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Human description of the portion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portion_description: Option<String>,
    /// Weight of the portion in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gram_weight: Option<f64>,
}

/// Body of `POST {base}/foods` for batched lookup
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FdcBatchRequest {
    /// Ids to fetch, at most 20 per request
    pub fdc_ids: Vec<u64>,
    /// Response format ("abridged" or "full")
    pub format: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nutrient_entry_reads_flat_search_shape() {
        let entry: FdcNutrientEntry = serde_json::from_str(
            r#"{"nutrientId": 1008, "nutrientName": "Energy", "unitName": "kcal", "value": 52.0}"#,
        )
        .unwrap();
        assert_eq!(entry.number(), Some(1008));
        assert!((entry.quantity() - 52.0).abs() < f64::EPSILON);
        assert_eq!(entry.unit(), Some("kcal"));
    }

    #[test]
    fn nutrient_entry_reads_nested_detail_shape() {
        let entry: FdcNutrientEntry = serde_json::from_str(
            r#"{"nutrient": {"id": 1003, "name": "Protein", "unitName": "g"}, "amount": 31.02}"#,
        )
        .unwrap();
        assert_eq!(entry.number(), Some(1003));
        assert!((entry.quantity() - 31.02).abs() < f64::EPSILON);
        assert_eq!(entry.unit(), Some("g"));
    }

    #[test]
    fn search_response_tolerates_missing_fields() {
        let response: FdcSearchResponse = serde_json::from_str(r"{}").unwrap();
        assert!(response.foods.is_empty());
        assert_eq!(response.total_hits, 0);
    }

    #[test]
    fn search_request_serializes_camel_case() {
        let request = FdcSearchRequest {
            query: "apple".into(),
            data_type: vec!["Branded".into()],
            page_size: 25,
            page_number: 1,
            sort_by: "dataType.keyword".into(),
            sort_order: "asc".into(),
            brand_owner: String::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("pageSize").is_some());
        assert!(json.get("pageNumber").is_some());
        assert!(json.get("brandOwner").is_some());
    }
}
