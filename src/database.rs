// ABOUTME: Postgres implementation of the food store behind the internal provider
// ABOUTME: Offset/limit listing with ILIKE name filtering, newest-first ordering, and CRUD
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use forkful_core::StoredFood;
use forkful_providers::store::{FoodDraft, FoodQuery, FoodStore, StoreError};

/// Columns selected for every food row read
const FOOD_COLUMNS: &str = "id, name, brand, serving_size, serving_unit, \
     calories, protein, carbs, fat, owner_id, created_at, updated_at";

/// Postgres-backed food store
#[derive(Debug, Clone)]
pub struct PgFoodStore {
    pool: PgPool,
}

impl PgFoodStore {
    /// Wrap an existing connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database at `url`.
    ///
    /// # Errors
    ///
    /// Fails with a backend error when the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(backend_error)?;
        Ok(Self::new(pool))
    }

    /// Apply pending migrations from the bundled `migrations/` directory.
    ///
    /// # Errors
    ///
    /// Fails with a backend error when a migration cannot be applied.
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))
    }
}

fn backend_error(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn row_to_food(row: &sqlx::postgres::PgRow) -> Result<StoredFood, sqlx::Error> {
    Ok(StoredFood {
        id: row.try_get::<i64, _>("id")?,
        name: row.try_get("name")?,
        brand: row.try_get("brand")?,
        serving_size: row.try_get("serving_size")?,
        serving_unit: row.try_get("serving_unit")?,
        calories: row.try_get("calories")?,
        protein: row.try_get("protein")?,
        carbs: row.try_get("carbs")?,
        fat: row.try_get("fat")?,
        owner_id: row.try_get::<Uuid, _>("owner_id")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait]
impl FoodStore for PgFoodStore {
    async fn list_foods(&self, query: &FoodQuery) -> Result<Vec<StoredFood>, StoreError> {
        let mut builder = QueryBuilder::new(format!("SELECT {FOOD_COLUMNS} FROM foods"));
        let mut has_where = false;

        if let Some(name) = query
            .name_contains
            .as_ref()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
        {
            builder.push(" WHERE name ILIKE ");
            builder.push_bind(format!("%{name}%"));
            has_where = true;
        }
        if let Some(owner_id) = query.owner_id {
            builder.push(if has_where { " AND " } else { " WHERE " });
            builder.push("owner_id = ");
            builder.push_bind(owner_id);
        }

        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(i64::from(query.limit));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(query.offset).unwrap_or(i64::MAX));

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(backend_error)?;
        rows.iter()
            .map(|row| row_to_food(row).map_err(backend_error))
            .collect()
    }

    async fn get_food(&self, id: i64) -> Result<Option<StoredFood>, StoreError> {
        let row = sqlx::query(&format!("SELECT {FOOD_COLUMNS} FROM foods WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend_error)?;
        row.as_ref()
            .map(|row| row_to_food(row).map_err(backend_error))
            .transpose()
    }

    async fn insert_food(&self, draft: &FoodDraft) -> Result<StoredFood, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO foods \
                 (name, brand, serving_size, serving_unit, calories, protein, carbs, fat, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {FOOD_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.brand)
        .bind(draft.serving_size)
        .bind(&draft.serving_unit)
        .bind(draft.calories)
        .bind(draft.protein)
        .bind(draft.carbs)
        .bind(draft.fat)
        .bind(draft.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(backend_error)?;
        row_to_food(&row).map_err(backend_error)
    }

    async fn update_food(&self, food: &StoredFood) -> Result<StoredFood, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE foods SET \
                 name = $2, brand = $3, serving_size = $4, serving_unit = $5, \
                 calories = $6, protein = $7, carbs = $8, fat = $9, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {FOOD_COLUMNS}"
        ))
        .bind(food.id)
        .bind(&food.name)
        .bind(&food.brand)
        .bind(food.serving_size)
        .bind(&food.serving_unit)
        .bind(food.calories)
        .bind(food.protein)
        .bind(food.carbs)
        .bind(food.fat)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_error)?;

        match row {
            Some(row) => row_to_food(&row).map_err(backend_error),
            None => Err(StoreError::NotFound(food.id)),
        }
    }

    async fn delete_food(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend_error)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
