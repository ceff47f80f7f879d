// ABOUTME: Food provider adapter for the USDA FoodData Central API
// ABOUTME: Transforms FDC payloads into normalized foods with unit and serving resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::core::{
    validate_search_options, FoodProvider, ProviderResponse, ProviderSettings,
    ProviderSettingsPatch, RateLimitSettings, SearchOptions, SortOrder,
};
use crate::errors::provider::ProviderResult;
use crate::fdc::client::{FdcClient, FdcSearchParams};
use crate::fdc::models::FdcFood;
use crate::models::food::{FoodSource, NormalizedFood};
use crate::pagination::PageMetadata;
use crate::similarity::clean_food_name;

/// External foods rank below internal duplicates by default
const DEFAULT_FDC_PRIORITY: i32 = 5;
/// FDC results cache TTL (1 hour)
const DEFAULT_FDC_CACHE_TTL_MS: u64 = 60 * 60 * 1000;
/// Default page size for FDC searches
const DEFAULT_FDC_PAGE_SIZE: u32 = 25;

/// FDC nutrient numbers for the four tracked macros
mod nutrient_numbers {
    /// Energy (kcal)
    pub const ENERGY: u32 = 1008;
    /// Protein
    pub const PROTEIN: u32 = 1003;
    /// Carbohydrate, by difference
    pub const CARBOHYDRATE: u32 = 1005;
    /// Total lipid (fat)
    pub const FAT: u32 = 1004;
}

/// Extracted macro values in standard units
#[derive(Debug, Clone, Copy, Default)]
struct MacroValues {
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

/// Provider for the USDA FoodData Central API
pub struct FdcFoodProvider {
    client: FdcClient,
    settings: RwLock<ProviderSettings>,
}

impl FdcFoodProvider {
    /// Default configuration for the FDC provider
    #[must_use]
    pub fn default_settings() -> ProviderSettings {
        ProviderSettings {
            enabled: true,
            priority: DEFAULT_FDC_PRIORITY,
            rate_limit: Some(RateLimitSettings {
                requests_per_minute: 100,
                requests_per_day: Some(10_000),
            }),
            cache_ttl_ms: Some(DEFAULT_FDC_CACHE_TTL_MS),
        }
    }

    /// Create a provider with default settings
    #[must_use]
    pub fn new(client: FdcClient) -> Self {
        Self::with_settings(client, Self::default_settings())
    }

    /// Create a provider with explicit settings
    #[must_use]
    pub fn with_settings(client: FdcClient, settings: ProviderSettings) -> Self {
        Self {
            client,
            settings: RwLock::new(settings),
        }
    }

    /// Probe whether the configured API key is accepted upstream
    pub async fn validate_api_key(&self) -> bool {
        self.client.validate_api_key().await.unwrap_or(false)
    }

    /// Fetch and normalize multiple foods by FDC id.
    ///
    /// # Errors
    ///
    /// Propagates client errors from the batched lookup.
    pub async fn get_foods_by_ids(&self, fdc_ids: &[u64]) -> ProviderResult<Vec<NormalizedFood>> {
        let foods = self.client.get_foods_by_ids(fdc_ids).await?;
        Ok(foods.iter().map(normalize_fdc_food).collect())
    }
}

#[async_trait]
impl FoodProvider for FdcFoodProvider {
    fn source(&self) -> FoodSource {
        FoodSource::FdcUsda
    }

    fn config(&self) -> ProviderSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update_config(&self, patch: ProviderSettingsPatch) {
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(patch);
    }

    async fn search_foods(&self, options: &SearchOptions) -> ProviderResult<ProviderResponse> {
        validate_search_options(self.source(), options)?;

        let page = options.page.unwrap_or(1);
        let page_size = options.page_size.unwrap_or(DEFAULT_FDC_PAGE_SIZE);
        let query = options.query.as_deref().unwrap_or("").trim();

        // Browsing without a query would scan the whole corpus upstream.
        if query.is_empty() {
            return Ok(ProviderResponse::empty(self.source(), page, page_size));
        }

        let params = FdcSearchParams {
            query: query.to_owned(),
            page_number: page,
            page_size,
            data_types: Vec::new(),
            sort_by: options.sort_by.clone(),
            sort_order: options.sort_order.map(|order| match order {
                SortOrder::Asc => "asc".to_owned(),
                SortOrder::Desc => "desc".to_owned(),
            }),
        };
        let response = self.client.search_foods(&params).await?;

        let foods: Vec<NormalizedFood> = response.foods.iter().map(normalize_fdc_food).collect();
        let current_page = if response.current_page > 0 {
            response.current_page
        } else {
            page
        };
        let pagination = PageMetadata {
            page: current_page,
            page_size,
            total_items: Some(response.total_hits),
            total_pages: Some(response.total_pages),
            has_next_page: u64::from(current_page) < response.total_pages,
            has_previous_page: current_page > 1,
        };

        Ok(ProviderResponse {
            foods,
            pagination,
            source: self.source(),
        })
    }

    async fn get_food_by_id(&self, id: &str) -> ProviderResult<Option<NormalizedFood>> {
        let Ok(fdc_id) = id.parse::<u64>() else {
            return Ok(None);
        };
        let food = self.client.get_food_by_id(fdc_id).await?;
        Ok(food.as_ref().map(normalize_fdc_food))
    }
}

/// Transform an FDC payload into the unified food shape.
///
/// Nutrients are matched by fixed nutrient numbers; absent nutrients default
/// to zero. Serving size resolution prefers an explicit serving, then the
/// portion closest to 100 g, then a flat 100 g default.
#[must_use]
pub fn normalize_fdc_food(food: &FdcFood) -> NormalizedFood {
    let macros = extract_macros(food);
    let (serving_size, serving_unit) = resolve_serving(food);
    let brand = brand_label(food);

    let mut provider_metadata = Map::new();
    provider_metadata.insert("fdc_id".into(), Value::from(food.fdc_id));
    provider_metadata.insert("original_description".into(), Value::from(food.description.clone()));
    if let Some(data_type) = &food.data_type {
        provider_metadata.insert("data_type".into(), Value::from(data_type.clone()));
    }
    if let Some(brand_owner) = &food.brand_owner {
        provider_metadata.insert("brand_owner".into(), Value::from(brand_owner.clone()));
    }
    if let Some(brand_name) = &food.brand_name {
        provider_metadata.insert("brand_name".into(), Value::from(brand_name.clone()));
    }
    if let Some(ingredients) = &food.ingredients {
        provider_metadata.insert("ingredients".into(), Value::from(ingredients.clone()));
    }
    if let Some(portions) = &food.food_portions {
        if let Ok(value) = serde_json::to_value(portions) {
            provider_metadata.insert("food_portions".into(), value);
        }
    }

    NormalizedFood {
        name: clean_food_name(&food.description),
        brand,
        serving_size,
        serving_unit,
        calories: macros.calories,
        protein: macros.protein,
        carbs: macros.carbs,
        fat: macros.fat,
        source: FoodSource::FdcUsda,
        external_id: Some(food.fdc_id.to_string()),
        provider_metadata,
        id: None,
        created_at: None,
        updated_at: None,
        owner_id: None,
    }
}

fn extract_macros(food: &FdcFood) -> MacroValues {
    let mut macros = MacroValues::default();
    for entry in &food.food_nutrients {
        let Some(number) = entry.number() else {
            continue;
        };
        let unit = entry.unit().unwrap_or("g");
        match number {
            nutrient_numbers::ENERGY => {
                macros.calories = convert_unit(entry.quantity(), unit, "kcal");
            }
            nutrient_numbers::PROTEIN => {
                macros.protein = convert_unit(entry.quantity(), unit, "g");
            }
            nutrient_numbers::CARBOHYDRATE => {
                macros.carbs = convert_unit(entry.quantity(), unit, "g");
            }
            nutrient_numbers::FAT => {
                macros.fat = convert_unit(entry.quantity(), unit, "g");
            }
            _ => {}
        }
    }
    macros
}

/// Convert a nutrient value to the target unit, rounded to 2 decimals.
///
/// kJ→kcal divides by 4.184; mg→g divides by 1000; identical units pass
/// through. Unknown pairs pass the value through unchanged apart from
/// rounding.
fn convert_unit(value: f64, from_unit: &str, to_unit: &str) -> f64 {
    let from = from_unit.to_lowercase();
    let to = to_unit.to_lowercase();

    let converted = if from == to {
        value
    } else if from == "kj" && to == "kcal" {
        value / 4.184
    } else if from == "mg" && to == "g" {
        value / 1000.0
    } else {
        value
    };
    round2(converted)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serving size resolution: explicit serving, then the portion whose gram
/// weight is closest to 100 g, then a flat 100 g default.
fn resolve_serving(food: &FdcFood) -> (f64, String) {
    if let (Some(size), Some(unit)) = (food.serving_size, &food.serving_size_unit) {
        return (size, unit.clone());
    }

    if let Some(portions) = &food.food_portions {
        let closest = portions
            .iter()
            .filter_map(|portion| portion.gram_weight.filter(|&weight| weight > 0.0))
            .min_by(|a, b| {
                (a - 100.0)
                    .abs()
                    .partial_cmp(&(b - 100.0).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some(weight) = closest {
            return (weight, "g".to_owned());
        }
    }

    (100.0, "g".to_owned())
}

/// Brand string: "brandName (brandOwner)" when both exist, else whichever
/// is present.
fn brand_label(food: &FdcFood) -> Option<String> {
    match (&food.brand_name, &food.brand_owner) {
        (Some(name), Some(owner)) => Some(format!("{name} ({owner})")),
        (Some(name), None) => Some(name.clone()),
        (None, Some(owner)) => Some(owner.clone()),
        (None, None) => None,
    }
}
