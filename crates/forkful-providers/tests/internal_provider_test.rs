// ABOUTME: Integration tests for the internal-database food provider
// ABOUTME: Covers paging heuristics, name filtering, CRUD passthroughs, and source guards
#![allow(missing_docs, clippy::unwrap_used)]
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use std::sync::Arc;

use forkful_providers::core::{FoodProvider, SearchOptions};
use forkful_providers::models::food::FoodSource;
use forkful_providers::store::{FoodDraft, FoodStore, MemoryFoodStore};
use forkful_providers::InternalFoodProvider;
use uuid::Uuid;

fn draft(name: &str, owner: Uuid) -> FoodDraft {
    FoodDraft {
        name: name.into(),
        brand: None,
        serving_size: 100.0,
        serving_unit: "g".into(),
        calories: 120.0,
        protein: 10.0,
        carbs: 5.0,
        fat: 6.0,
        owner_id: owner,
    }
}

async fn seeded_provider(names: &[&str]) -> InternalFoodProvider {
    let store = Arc::new(MemoryFoodStore::new());
    let owner = Uuid::new_v4();
    for name in names {
        store.insert_food(&draft(name, owner)).await.unwrap();
    }
    InternalFoodProvider::new(store)
}

#[tokio::test]
async fn search_filters_by_case_insensitive_substring() {
    let provider = seeded_provider(&["Chicken Soup", "Beef Stew", "chicken breast"]).await;
    let response = provider
        .search_foods(&SearchOptions {
            query: Some("CHICKEN".into()),
            ..SearchOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(response.foods.len(), 2);
    assert!(response
        .foods
        .iter()
        .all(|food| food.name.to_lowercase().contains("chicken")));
    assert_eq!(response.source, FoodSource::Internal);
}

#[tokio::test]
async fn search_results_carry_internal_identity() {
    let provider = seeded_provider(&["Oatmeal"]).await;
    let response = provider
        .search_foods(&SearchOptions::default())
        .await
        .unwrap();

    let food = &response.foods[0];
    assert_eq!(food.source, FoodSource::Internal);
    assert!(food.id.is_some());
    assert!(food.owner_id.is_some());
    assert!(food.external_id.is_none());
}

#[tokio::test]
async fn partial_page_reports_no_next_page() {
    let provider = seeded_provider(&["A", "B", "C"]).await;
    let response = provider
        .search_foods(&SearchOptions {
            page: Some(1),
            page_size: Some(10),
            ..SearchOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(response.foods.len(), 3);
    assert!(!response.pagination.has_next_page);
    assert!(response.pagination.total_items.is_none());
}

#[tokio::test]
async fn full_final_page_over_reports_next_page() {
    // The heuristic's known false positive: exactly page_size items total
    // means the full page claims a successor that does not exist.
    let provider = seeded_provider(&["A", "B", "C"]).await;
    let response = provider
        .search_foods(&SearchOptions {
            page: Some(1),
            page_size: Some(3),
            ..SearchOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(response.foods.len(), 3);
    assert!(response.pagination.has_next_page);
}

#[tokio::test]
async fn second_page_applies_offset() {
    let provider = seeded_provider(&["A", "B", "C", "D", "E"]).await;
    let first = provider
        .search_foods(&SearchOptions {
            page: Some(1),
            page_size: Some(2),
            ..SearchOptions::default()
        })
        .await
        .unwrap();
    let second = provider
        .search_foods(&SearchOptions {
            page: Some(2),
            page_size: Some(2),
            ..SearchOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(first.foods.len(), 2);
    assert_eq!(second.foods.len(), 2);
    assert!(second.pagination.has_previous_page);
    let first_ids: Vec<i64> = first.foods.iter().filter_map(|f| f.id).collect();
    let second_ids: Vec<i64> = second.foods.iter().filter_map(|f| f.id).collect();
    assert!(first_ids.iter().all(|id| !second_ids.contains(id)));
}

#[tokio::test]
async fn oversized_page_size_is_rejected() {
    let provider = seeded_provider(&[]).await;
    let err = provider
        .search_foods(&SearchOptions {
            page_size: Some(500),
            ..SearchOptions::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_PAGE_SIZE");
}

#[tokio::test]
async fn get_by_id_returns_none_for_unknown_and_malformed_ids() {
    let provider = seeded_provider(&["Oatmeal"]).await;
    assert!(provider.get_food_by_id("999999").await.unwrap().is_none());
    assert!(provider.get_food_by_id("not-a-number").await.unwrap().is_none());
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let store = Arc::new(MemoryFoodStore::new());
    let provider = InternalFoodProvider::new(Arc::clone(&store) as Arc<dyn FoodStore>);
    let owner = Uuid::new_v4();

    let created = provider.create_food(&draft("Greek Yogurt", owner)).await.unwrap();
    let id = created.id.unwrap();

    let fetched = provider
        .get_food_by_id(&id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.name, "Greek Yogurt");
    assert_eq!(fetched.owner_id, Some(owner));
}

#[tokio::test]
async fn update_rejects_external_records() {
    let provider = seeded_provider(&["Oatmeal"]).await;
    let mut food = provider
        .search_foods(&SearchOptions::default())
        .await
        .unwrap()
        .foods
        .remove(0);
    food.source = FoodSource::FdcUsda;

    let err = provider.update_food(&food).await.unwrap_err();
    assert_eq!(err.code(), "EXTERNAL_FOOD_UPDATE");
}

#[tokio::test]
async fn update_changes_stored_fields() {
    let provider = seeded_provider(&["Oatmeal"]).await;
    let mut food = provider
        .search_foods(&SearchOptions::default())
        .await
        .unwrap()
        .foods
        .remove(0);
    food.calories = 201.0;

    let updated = provider.update_food(&food).await.unwrap();
    assert!((updated.calories - 201.0).abs() < f64::EPSILON);

    let fetched = provider
        .get_food_by_id(&food.id.unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert!((fetched.calories - 201.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn delete_rejects_malformed_ids() {
    let provider = seeded_provider(&["Oatmeal"]).await;
    let err = provider.delete_food("abc").await.unwrap_err();
    assert_eq!(err.code(), "INVALID_ID");
}

#[tokio::test]
async fn import_rejects_already_internal_foods() {
    let provider = seeded_provider(&["Oatmeal"]).await;
    let food = provider
        .search_foods(&SearchOptions::default())
        .await
        .unwrap()
        .foods
        .remove(0);

    let err = provider.import_food(&food, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.code(), "ALREADY_INTERNAL");
}

#[tokio::test]
async fn import_copies_external_food_into_store() {
    let store = Arc::new(MemoryFoodStore::new());
    let provider = InternalFoodProvider::new(Arc::clone(&store) as Arc<dyn FoodStore>);
    let owner = Uuid::new_v4();

    let mut external = forkful_core::stored_to_normalized(
        &store
            .insert_food(&draft("Cheddar", owner))
            .await
            .unwrap(),
    );
    // Rewrite the fixture into an external record.
    external.source = FoodSource::FdcUsda;
    external.id = None;
    external.owner_id = None;
    external.external_id = Some("534358".into());

    let imported = provider.import_food(&external, owner).await.unwrap();
    assert_eq!(imported.source, FoodSource::Internal);
    assert!(imported.id.is_some());
    assert_eq!(imported.owner_id, Some(owner));
}
