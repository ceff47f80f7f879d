// ABOUTME: Integration tests for the food aggregation service
// ABOUTME: Covers fan-out resilience, dedup priority rules, merge strategies, and pagination
#![allow(missing_docs, clippy::unwrap_used)]
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use forkful_providers::aggregator::{
    AggregatedSearchOptions, AggregatorConfig, FoodAggregator, MergeStrategy, AGGREGATED_SOURCE,
};
use forkful_providers::core::{
    FoodProvider, ProviderResponse, ProviderSettings, ProviderSettingsPatch, SearchOptions,
};
use forkful_providers::errors::provider::{ProviderError, ProviderResult};
use forkful_providers::models::food::{FoodSource, NormalizedFood};
use forkful_providers::pagination::PageMetadata;

/// Scripted provider behavior for one test
enum Script {
    Foods(Vec<&'static str>),
    Fail,
    Stall,
}

/// Test double implementing the provider contract from a fixed script
struct StubProvider {
    source: FoodSource,
    script: Script,
    settings: RwLock<ProviderSettings>,
}

impl StubProvider {
    fn new(source: FoodSource, priority: i32, script: Script) -> Arc<Self> {
        Arc::new(Self {
            source,
            script,
            settings: RwLock::new(ProviderSettings {
                enabled: true,
                priority,
                rate_limit: None,
                cache_ttl_ms: None,
            }),
        })
    }

    fn food(&self, name: &str) -> NormalizedFood {
        NormalizedFood {
            name: name.into(),
            brand: None,
            serving_size: 100.0,
            serving_unit: "g".into(),
            calories: 52.0,
            protein: 0.3,
            carbs: 14.0,
            fat: 0.2,
            source: self.source,
            external_id: None,
            provider_metadata: serde_json::Map::new(),
            id: None,
            created_at: None,
            updated_at: None,
            owner_id: None,
        }
    }
}

#[async_trait]
impl FoodProvider for StubProvider {
    fn source(&self) -> FoodSource {
        self.source
    }

    fn config(&self) -> ProviderSettings {
        self.settings.read().unwrap().clone()
    }

    fn update_config(&self, patch: ProviderSettingsPatch) {
        self.settings.write().unwrap().apply(patch);
    }

    async fn search_foods(&self, options: &SearchOptions) -> ProviderResult<ProviderResponse> {
        match &self.script {
            Script::Foods(names) => {
                let foods: Vec<NormalizedFood> = names.iter().map(|name| self.food(name)).collect();
                let count = foods.len();
                Ok(ProviderResponse {
                    foods,
                    pagination: PageMetadata::heuristic(
                        options.page.unwrap_or(1),
                        options.page_size.unwrap_or(25),
                        count,
                    ),
                    source: self.source,
                })
            }
            Script::Fail => Err(ProviderError::Search {
                provider: self.source,
                message: "backend unavailable".into(),
            }),
            Script::Stall => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(ProviderResponse::empty(self.source, 1, 25))
            }
        }
    }

    async fn get_food_by_id(&self, id: &str) -> ProviderResult<Option<NormalizedFood>> {
        match &self.script {
            Script::Foods(names) if id == "known" => {
                Ok(names.first().map(|name| self.food(name)))
            }
            Script::Fail => Err(ProviderError::GetById {
                provider: self.source,
                message: "backend unavailable".into(),
            }),
            _ => Ok(None),
        }
    }
}

fn aggregator_with(providers: Vec<Arc<StubProvider>>) -> FoodAggregator {
    let mut config = AggregatorConfig::default();
    // Stub providers return whole scripts; page size overrides are irrelevant.
    config.default_page_sizes.clear();
    let mut aggregator = FoodAggregator::new(config);
    for provider in providers {
        aggregator.register_provider(provider);
    }
    aggregator
}

#[tokio::test]
async fn near_duplicates_resolve_to_the_higher_priority_source() {
    // The canonical scenario: the internal "Chicken Soup" (priority 10) and
    // the external "Chicken soup, canned" (priority 5) collapse to one item.
    let aggregator = aggregator_with(vec![
        StubProvider::new(FoodSource::Internal, 10, Script::Foods(vec!["Chicken Soup"])),
        StubProvider::new(
            FoodSource::FdcUsda,
            5,
            Script::Foods(vec!["Chicken soup, canned"]),
        ),
    ]);

    let response = aggregator
        .search_foods(&AggregatedSearchOptions {
            search: SearchOptions {
                query: Some("chicken".into()),
                page: Some(1),
                page_size: Some(10),
                ..SearchOptions::default()
            },
            ..AggregatedSearchOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(response.foods.len(), 1);
    assert_eq!(response.foods[0].source, FoodSource::Internal);
    assert_eq!(response.source, AGGREGATED_SOURCE);
    assert_eq!(response.stats.total_results, 1);
    assert_eq!(
        response.stats.source_breakdown.get(&FoodSource::Internal),
        Some(&1)
    );
    assert!(response
        .stats
        .source_breakdown
        .get(&FoodSource::FdcUsda)
        .is_none());
}

#[tokio::test]
async fn provider_failure_yields_partial_results() {
    let aggregator = aggregator_with(vec![
        StubProvider::new(FoodSource::Internal, 10, Script::Foods(vec!["Apple"])),
        StubProvider::new(FoodSource::FdcUsda, 5, Script::Fail),
    ]);

    let response = aggregator
        .search_foods(&AggregatedSearchOptions::default())
        .await
        .unwrap();

    assert_eq!(response.foods.len(), 1);
    assert_eq!(response.foods[0].source, FoodSource::Internal);
    assert!(response
        .stats
        .source_breakdown
        .get(&FoodSource::FdcUsda)
        .is_none());
}

#[tokio::test]
async fn stalled_provider_is_timed_out_and_absorbed() {
    let mut config = AggregatorConfig::default();
    config.default_page_sizes.clear();
    config.provider_timeout = Duration::from_millis(50);
    let mut aggregator = FoodAggregator::new(config);
    aggregator.register_provider(StubProvider::new(
        FoodSource::Internal,
        10,
        Script::Foods(vec!["Apple"]),
    ));
    aggregator.register_provider(StubProvider::new(FoodSource::FdcUsda, 5, Script::Stall));

    let response = aggregator
        .search_foods(&AggregatedSearchOptions::default())
        .await
        .unwrap();

    assert_eq!(response.foods.len(), 1);
    assert_eq!(response.foods[0].source, FoodSource::Internal);
}

#[tokio::test]
async fn empty_active_set_returns_immediately() {
    let aggregator = aggregator_with(vec![]);
    let response = aggregator
        .search_foods(&AggregatedSearchOptions {
            search: SearchOptions {
                page: Some(2),
                page_size: Some(40),
                ..SearchOptions::default()
            },
            ..AggregatedSearchOptions::default()
        })
        .await
        .unwrap();

    assert!(response.foods.is_empty());
    assert_eq!(response.pagination.page, 2);
    assert_eq!(response.pagination.page_size, 40);
    assert_eq!(response.stats.total_results, 0);
}

#[tokio::test]
async fn disabled_provider_is_excluded_from_fan_out() {
    let internal = StubProvider::new(FoodSource::Internal, 10, Script::Foods(vec!["Apple"]));
    let external = StubProvider::new(FoodSource::FdcUsda, 5, Script::Foods(vec!["Banana"]));
    external.update_config(ProviderSettingsPatch {
        enabled: Some(false),
        ..ProviderSettingsPatch::default()
    });

    let aggregator = aggregator_with(vec![internal, external]);
    let response = aggregator
        .search_foods(&AggregatedSearchOptions::default())
        .await
        .unwrap();

    assert_eq!(response.foods.len(), 1);
    assert_eq!(response.foods[0].source, FoodSource::Internal);
}

#[tokio::test]
async fn requested_provider_list_narrows_the_fan_out() {
    let aggregator = aggregator_with(vec![
        StubProvider::new(FoodSource::Internal, 10, Script::Foods(vec!["Apple"])),
        StubProvider::new(FoodSource::FdcUsda, 5, Script::Foods(vec!["Banana"])),
    ]);

    let response = aggregator
        .search_foods(&AggregatedSearchOptions {
            providers: Some(vec![FoodSource::FdcUsda]),
            ..AggregatedSearchOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(response.foods.len(), 1);
    assert_eq!(response.foods[0].source, FoodSource::FdcUsda);
}

#[tokio::test]
async fn per_request_priority_override_beats_provider_config() {
    let aggregator = aggregator_with(vec![
        StubProvider::new(FoodSource::Internal, 10, Script::Foods(vec!["Chicken Soup"])),
        StubProvider::new(
            FoodSource::FdcUsda,
            5,
            Script::Foods(vec!["Chicken soup, canned"]),
        ),
    ]);

    let mut overrides = std::collections::HashMap::new();
    overrides.insert(FoodSource::FdcUsda, 99);
    let response = aggregator
        .search_foods(&AggregatedSearchOptions {
            provider_priority: Some(overrides),
            ..AggregatedSearchOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(response.foods.len(), 1);
    assert_eq!(response.foods[0].source, FoodSource::FdcUsda);
}

#[tokio::test]
async fn dedup_can_be_disabled_per_request() {
    let aggregator = aggregator_with(vec![
        StubProvider::new(FoodSource::Internal, 10, Script::Foods(vec!["Chicken Soup"])),
        StubProvider::new(
            FoodSource::FdcUsda,
            5,
            Script::Foods(vec!["Chicken soup, canned"]),
        ),
    ]);

    let response = aggregator
        .search_foods(&AggregatedSearchOptions {
            enable_deduplication: Some(false),
            ..AggregatedSearchOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(response.foods.len(), 2);
    assert_eq!(response.stats.total_results, 2);
}

#[tokio::test]
async fn pagination_over_merged_list_is_exact() {
    let aggregator = aggregator_with(vec![
        StubProvider::new(
            FoodSource::Internal,
            10,
            Script::Foods(vec!["Apple", "Banana", "Cherry"]),
        ),
        StubProvider::new(
            FoodSource::FdcUsda,
            5,
            Script::Foods(vec!["Durian", "Elderberry"]),
        ),
    ]);

    let response = aggregator
        .search_foods(&AggregatedSearchOptions {
            search: SearchOptions {
                page: Some(2),
                page_size: Some(2),
                ..SearchOptions::default()
            },
            ..AggregatedSearchOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(response.pagination.total_items, Some(5));
    assert_eq!(response.pagination.total_pages, Some(3));
    assert!(response.pagination.has_next_page);
    assert!(response.pagination.has_previous_page);
    assert_eq!(response.foods.len(), 2);
    // Stats describe the whole merged set, not the page.
    assert_eq!(response.stats.total_results, 5);
}

#[tokio::test]
async fn interleave_strategy_alternates_sources() {
    let aggregator = aggregator_with(vec![
        StubProvider::new(FoodSource::Internal, 10, Script::Foods(vec!["I1", "I2"])),
        StubProvider::new(FoodSource::FdcUsda, 5, Script::Foods(vec!["F1", "F2"])),
    ]);

    let response = aggregator
        .search_foods(&AggregatedSearchOptions {
            merge_strategy: Some(MergeStrategy::Interleave),
            enable_deduplication: Some(false),
            ..AggregatedSearchOptions::default()
        })
        .await
        .unwrap();

    let sources: Vec<FoodSource> = response.foods.iter().map(|food| food.source).collect();
    assert_eq!(
        sources,
        vec![
            FoodSource::FdcUsda,
            FoodSource::Internal,
            FoodSource::FdcUsda,
            FoodSource::Internal,
        ]
    );
}

#[tokio::test]
async fn get_food_by_id_routes_to_the_matching_provider() {
    let aggregator = aggregator_with(vec![
        StubProvider::new(FoodSource::Internal, 10, Script::Foods(vec!["Apple"])),
        StubProvider::new(FoodSource::FdcUsda, 5, Script::Fail),
    ]);

    let found = aggregator.get_food_by_id("known", FoodSource::Internal).await;
    assert_eq!(found.map(|food| food.name), Some("Apple".into()));

    // Errors from the provider are absorbed to None.
    assert!(aggregator.get_food_by_id("known", FoodSource::FdcUsda).await.is_none());
}

#[tokio::test]
async fn provider_accessor_exposes_registered_sources() {
    let aggregator = aggregator_with(vec![StubProvider::new(
        FoodSource::Internal,
        10,
        Script::Foods(vec![]),
    )]);

    assert!(aggregator.provider(FoodSource::Internal).is_some());
    assert!(aggregator.provider(FoodSource::FdcUsda).is_none());
    assert_eq!(aggregator.available_providers(), vec![FoodSource::Internal]);
}

#[tokio::test]
async fn update_config_re_derives_provider_enablement() {
    let internal = StubProvider::new(FoodSource::Internal, 10, Script::Foods(vec!["Apple"]));
    let aggregator = aggregator_with(vec![Arc::clone(&internal)]);

    let mut config = AggregatorConfig::default();
    config.enabled_providers = vec![FoodSource::FdcUsda];
    aggregator.update_config(config);

    assert!(!internal.is_enabled());
    assert!(aggregator.enabled_providers().is_empty());
}
