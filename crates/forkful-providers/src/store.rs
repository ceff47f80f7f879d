// ABOUTME: Food storage abstraction backing the internal provider
// ABOUTME: FoodStore trait plus an in-memory implementation for tests and demo runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::food::StoredFood;

/// Errors from the storage layer, translated to provider errors at the
/// internal provider boundary
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backend failed (connection, query, constraint)
    #[error("storage backend failure: {0}")]
    Backend(String),
    /// No row with the given id
    #[error("food {0} not found")]
    NotFound(i64),
}

/// Listing query for the food store
#[derive(Debug, Clone, Default)]
pub struct FoodQuery {
    /// Maximum rows to return
    pub limit: u32,
    /// Rows to skip
    pub offset: u64,
    /// Case-insensitive substring filter on the food name
    pub name_contains: Option<String>,
    /// Restrict to one owner's records
    pub owner_id: Option<Uuid>,
}

/// Fields for creating a new food row
#[derive(Debug, Clone)]
pub struct FoodDraft {
    /// Food name
    pub name: String,
    /// Brand, if any
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
}

/// Relational access to stored foods.
///
/// Listing is offset-based and ordered newest-first; implementations are not
/// required to report totals, which is why the internal provider paginates
/// heuristically.
#[async_trait]
pub trait FoodStore: Send + Sync {
    /// List foods matching the query, newest first
    async fn list_foods(&self, query: &FoodQuery) -> Result<Vec<StoredFood>, StoreError>;

    /// Fetch one food by id; `Ok(None)` when absent
    async fn get_food(&self, id: i64) -> Result<Option<StoredFood>, StoreError>;

    /// Insert a new food and return the stored row
    async fn insert_food(&self, draft: &FoodDraft) -> Result<StoredFood, StoreError>;

    /// Update an existing food and return the stored row
    async fn update_food(&self, food: &StoredFood) -> Result<StoredFood, StoreError>;

    /// Delete a food by id
    async fn delete_food(&self, id: i64) -> Result<(), StoreError>;
}

/// In-memory food store for tests and database-less demo runs
#[derive(Debug)]
pub struct MemoryFoodStore {
    foods: RwLock<HashMap<i64, StoredFood>>,
    next_id: AtomicI64,
}

impl Default for MemoryFoodStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFoodStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            foods: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.foods.read().await.len()
    }

    /// Whether the store holds no rows
    pub async fn is_empty(&self) -> bool {
        self.foods.read().await.is_empty()
    }
}

#[async_trait]
impl FoodStore for MemoryFoodStore {
    async fn list_foods(&self, query: &FoodQuery) -> Result<Vec<StoredFood>, StoreError> {
        let foods = self.foods.read().await;
        let needle = query
            .name_contains
            .as_ref()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty());

        let mut matching: Vec<StoredFood> = foods
            .values()
            .filter(|food| {
                needle
                    .as_ref()
                    .is_none_or(|needle| food.name.to_lowercase().contains(needle))
            })
            .filter(|food| query.owner_id.is_none_or(|owner| food.owner_id == owner))
            .cloned()
            .collect();

        // Newest first, id as tiebreaker for a stable order.
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(matching
            .into_iter()
            .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
            .take(query.limit as usize)
            .collect())
    }

    async fn get_food(&self, id: i64) -> Result<Option<StoredFood>, StoreError> {
        Ok(self.foods.read().await.get(&id).cloned())
    }

    async fn insert_food(&self, draft: &FoodDraft) -> Result<StoredFood, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let food = StoredFood {
            id,
            name: draft.name.clone(),
            brand: draft.brand.clone(),
            serving_size: draft.serving_size,
            serving_unit: draft.serving_unit.clone(),
            calories: draft.calories,
            protein: draft.protein,
            carbs: draft.carbs,
            fat: draft.fat,
            owner_id: draft.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.foods.write().await.insert(id, food.clone());
        Ok(food)
    }

    async fn update_food(&self, food: &StoredFood) -> Result<StoredFood, StoreError> {
        let mut foods = self.foods.write().await;
        if !foods.contains_key(&food.id) {
            return Err(StoreError::NotFound(food.id));
        }
        let mut updated = food.clone();
        updated.updated_at = Utc::now();
        foods.insert(food.id, updated.clone());
        Ok(updated)
    }

    async fn delete_food(&self, id: i64) -> Result<(), StoreError> {
        match self.foods.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id)),
        }
    }
}
