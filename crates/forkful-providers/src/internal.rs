// ABOUTME: Internal-database food provider over the FoodStore abstraction
// ABOUTME: Adapts the user's own stored foods to the provider contract, plus CRUD passthroughs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::core::{
    validate_search_options, FoodProvider, ProviderResponse, ProviderSettings,
    ProviderSettingsPatch, SearchOptions,
};
use crate::errors::provider::{ProviderError, ProviderResult};
use crate::models::compat::{normalized_to_stored, stored_to_normalized};
use crate::models::food::{FoodSource, NormalizedFood};
use crate::pagination::{PageMetadata, PageRequest};
use crate::store::{FoodDraft, FoodQuery, FoodStore, StoreError};

/// Default page size for internal searches
const DEFAULT_INTERNAL_PAGE_SIZE: u32 = 10;
/// Internal foods outrank external duplicates by default
const DEFAULT_INTERNAL_PRIORITY: i32 = 10;
/// Internal results cache TTL (5 minutes)
const DEFAULT_INTERNAL_CACHE_TTL_MS: u64 = 5 * 60 * 1000;

/// Provider over the user's own food database.
///
/// Search translates page/page-size into an offset/limit store query with an
/// optional case-insensitive name filter. The store does not report totals,
/// so `has_next_page` is heuristic: a full page is assumed to have a
/// successor. Beyond the read contract this provider exposes create, update,
/// and delete operations restricted to internal-sourced records.
pub struct InternalFoodProvider {
    store: Arc<dyn FoodStore>,
    settings: RwLock<ProviderSettings>,
}

impl InternalFoodProvider {
    /// Default configuration for the internal provider
    #[must_use]
    pub fn default_settings() -> ProviderSettings {
        ProviderSettings {
            enabled: true,
            priority: DEFAULT_INTERNAL_PRIORITY,
            rate_limit: None,
            cache_ttl_ms: Some(DEFAULT_INTERNAL_CACHE_TTL_MS),
        }
    }

    /// Create a provider with default settings
    #[must_use]
    pub fn new(store: Arc<dyn FoodStore>) -> Self {
        Self::with_settings(store, Self::default_settings())
    }

    /// Create a provider with explicit settings
    #[must_use]
    pub fn with_settings(store: Arc<dyn FoodStore>, settings: ProviderSettings) -> Self {
        Self {
            store,
            settings: RwLock::new(settings),
        }
    }

    fn store_error(err: StoreError) -> ProviderError {
        ProviderError::Store {
            provider: FoodSource::Internal,
            message: err.to_string(),
        }
    }

    /// Create a new internal food from a draft.
    ///
    /// # Errors
    ///
    /// Fails with a storage error when the insert fails.
    pub async fn create_food(&self, draft: &FoodDraft) -> ProviderResult<NormalizedFood> {
        let stored = self
            .store
            .insert_food(draft)
            .await
            .map_err(Self::store_error)?;
        Ok(stored_to_normalized(&stored))
    }

    /// Update an existing internal food.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::ExternalFoodUpdate`] when the record is
    /// not internal-sourced, [`ProviderError::MissingId`] when it has no id,
    /// and a storage error when the update fails.
    pub async fn update_food(&self, food: &NormalizedFood) -> ProviderResult<NormalizedFood> {
        let stored = normalized_to_stored(food)?;
        let updated = self
            .store
            .update_food(&stored)
            .await
            .map_err(Self::store_error)?;
        Ok(stored_to_normalized(&updated))
    }

    /// Delete an internal food by id.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::InvalidId`] for a non-numeric id and a
    /// storage error when the delete fails.
    pub async fn delete_food(&self, id: &str) -> ProviderResult<()> {
        let numeric_id: i64 = id.parse().map_err(|_| ProviderError::InvalidId {
            provider: FoodSource::Internal,
            id: id.to_owned(),
        })?;
        self.store
            .delete_food(numeric_id)
            .await
            .map_err(Self::store_error)
    }

    /// Copy an external food into the internal database for an owner.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::AlreadyInternal`] when the record is
    /// already internal-sourced, and a storage error when the insert fails.
    pub async fn import_food(
        &self,
        food: &NormalizedFood,
        owner_id: Uuid,
    ) -> ProviderResult<NormalizedFood> {
        if food.source == FoodSource::Internal {
            return Err(ProviderError::AlreadyInternal {
                id: food.id.unwrap_or_default(),
            });
        }
        let draft = FoodDraft {
            name: food.name.clone(),
            brand: food.brand.clone(),
            serving_size: food.serving_size,
            serving_unit: food.serving_unit.clone(),
            calories: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
            owner_id,
        };
        self.create_food(&draft).await
    }
}

#[async_trait]
impl FoodProvider for InternalFoodProvider {
    fn source(&self) -> FoodSource {
        FoodSource::Internal
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

        let page = PageRequest::new(
            options.page,
            Some(options.page_size.unwrap_or(DEFAULT_INTERNAL_PAGE_SIZE)),
        );
        let query = FoodQuery {
            limit: page.page_size,
            offset: page.offset(),
            name_contains: options
                .query
                .as_ref()
                .map(|q| q.trim().to_owned())
                .filter(|q| !q.is_empty()),
            owner_id: None,
        };

        let stored = self
            .store
            .list_foods(&query)
            .await
            .map_err(Self::store_error)?;
        debug!(count = stored.len(), page = page.page, "internal food search");

        let foods: Vec<NormalizedFood> = stored.iter().map(stored_to_normalized).collect();
        // The store has no cheap count; a full page is assumed to have more.
        let pagination = PageMetadata::heuristic(page.page, page.page_size, foods.len());

        Ok(ProviderResponse {
            foods,
            pagination,
            source: self.source(),
        })
    }

    async fn get_food_by_id(&self, id: &str) -> ProviderResult<Option<NormalizedFood>> {
        let Ok(numeric_id) = id.parse::<i64>() else {
            return Ok(None);
        };
        let stored = self
            .store
            .get_food(numeric_id)
            .await
            .map_err(Self::store_error)?;
        Ok(stored.as_ref().map(stored_to_normalized))
    }
}
