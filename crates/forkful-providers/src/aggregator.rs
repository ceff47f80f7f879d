// ABOUTME: Aggregation service orchestrating every enabled food provider
// ABOUTME: Concurrent fan-out, similarity dedup, merge strategies, and exact pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! Multi-provider food search aggregation.
//!
//! [`FoodAggregator`] owns the set of provider instances for its lifetime
//! and fans a search out to every active provider concurrently. A single
//! provider's failure — or timeout — never fails the aggregation: the
//! failure is logged and that provider contributes an empty page. The merged
//! results are deduplicated by name similarity, ordered by the configured
//! merge strategy, and paginated with exact metadata computed from the
//! merged list.
//!
//! The aggregator is an explicit, injectable service: construct it once at
//! process start and pass it by handle to request handlers. The provider map
//! is never exposed; [`FoodAggregator::provider`] is the only accessor.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{FoodProvider, ProviderResponse, ProviderSettingsPatch, SearchOptions};
use crate::errors::provider::ProviderResult;
use crate::models::food::{FoodSource, NormalizedFood};
use crate::pagination::{PageMetadata, DEFAULT_PAGE_SIZE};
use crate::similarity::food_name_similarity;

/// Source marker carried by every aggregated response
pub const AGGREGATED_SOURCE: &str = "aggregated";

/// Default similarity threshold above which two foods are one item.
///
/// Set at the containment-tier score so a name fully contained in another
/// counts as a duplicate out of the box.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Default bound on one provider call during fan-out
const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on the merged result list
const DEFAULT_MAX_RESULTS: usize = 50;

/// Rule used to order deduplicated results before pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Descending priority only
    #[default]
    Priority,
    /// Group by source (lexically), descending priority within each group
    SourceGroups,
    /// Round-robin across per-source priority-sorted groups
    Interleave,
}

impl MergeStrategy {
    /// Parse a strategy from its wire name (case-insensitive); unknown
    /// names fall back to priority ordering
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "source_groups" => Self::SourceGroups,
            "interleave" => Self::Interleave,
            _ => Self::Priority,
        }
    }

    /// Wire name of this strategy
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::SourceGroups => "source_groups",
            Self::Interleave => "interleave",
        }
    }
}

/// Deduplication settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeduplicationConfig {
    /// Whether near-duplicates are collapsed
    pub enabled: bool,
    /// Minimum similarity score treated as a duplicate
    pub similarity_threshold: f64,
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Aggregator configuration
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Providers participating by default
    pub enabled_providers: Vec<FoodSource>,
    /// Result ordering rule
    pub merge_strategy: MergeStrategy,
    /// Deduplication settings
    pub deduplication: DeduplicationConfig,
    /// Per-source page sizes applied before fan-out
    pub default_page_sizes: HashMap<FoodSource, u32>,
    /// Cap on the merged result list
    pub max_results: usize,
    /// Bound on one provider call during fan-out
    pub provider_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        let mut default_page_sizes = HashMap::new();
        // Internal foods get more space than external ones by default.
        default_page_sizes.insert(FoodSource::Internal, 15);
        default_page_sizes.insert(FoodSource::FdcUsda, 10);

        Self {
            enabled_providers: vec![FoodSource::Internal, FoodSource::FdcUsda],
            merge_strategy: MergeStrategy::Priority,
            deduplication: DeduplicationConfig::default(),
            default_page_sizes,
            max_results: DEFAULT_MAX_RESULTS,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// Search options for an aggregated search
#[derive(Debug, Clone, Default)]
pub struct AggregatedSearchOptions {
    /// Options forwarded to every provider
    pub search: SearchOptions,
    /// Limit this search to specific providers
    pub providers: Option<Vec<FoodSource>>,
    /// Per-request priority overrides, winning over provider config
    pub provider_priority: Option<HashMap<FoodSource, i32>>,
    /// Per-request deduplication toggle, winning over config
    pub enable_deduplication: Option<bool>,
    /// Per-request merge strategy, winning over config
    pub merge_strategy: Option<MergeStrategy>,
}

/// Result statistics over the full merged, deduplicated set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationStats {
    /// Total results after merge and dedup, before pagination
    pub total_results: u64,
    /// Result counts per contributing source
    pub source_breakdown: HashMap<FoodSource, u64>,
}

/// The combined response of one aggregated search. Transient, constructed
/// per request.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedResponse {
    /// The requested page of merged results
    pub foods: Vec<NormalizedFood>,
    /// Exact pagination over the merged list
    pub pagination: PageMetadata,
    /// Always [`AGGREGATED_SOURCE`]
    pub source: &'static str,
    /// Statistics over the full merged set
    pub stats: AggregationStats,
}

impl AggregatedResponse {
    fn empty(page: u32, page_size: u32) -> Self {
        Self {
            foods: Vec::new(),
            pagination: PageMetadata::empty(page, page_size),
            source: AGGREGATED_SOURCE,
            stats: AggregationStats {
                total_results: 0,
                source_breakdown: HashMap::new(),
            },
        }
    }
}

/// A food tagged with the priority it competes with during merge
#[derive(Debug, Clone)]
struct RankedFood {
    food: NormalizedFood,
    priority: i32,
}

/// Service that orchestrates multiple food providers into unified search
/// results
pub struct FoodAggregator {
    providers: HashMap<FoodSource, Arc<dyn FoodProvider>>,
    config: RwLock<AggregatorConfig>,
}

impl FoodAggregator {
    /// Create an aggregator with no providers registered yet
    #[must_use]
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            providers: HashMap::new(),
            config: RwLock::new(config),
        }
    }

    /// Register a provider; called during startup wiring
    pub fn register_provider(&mut self, provider: Arc<dyn FoodProvider>) {
        let source = provider.source();
        info!(source = %source, priority = provider.priority(), "registering food provider");
        self.providers.insert(source, provider);
    }

    /// Look up a registered provider by source type
    #[must_use]
    pub fn provider(&self, source: FoodSource) -> Option<Arc<dyn FoodProvider>> {
        self.providers.get(&source).cloned()
    }

    /// Sources with a registered provider
    #[must_use]
    pub fn available_providers(&self) -> Vec<FoodSource> {
        self.providers.keys().copied().collect()
    }

    /// Sources with a registered and enabled provider
    #[must_use]
    pub fn enabled_providers(&self) -> Vec<FoodSource> {
        self.providers
            .iter()
            .filter(|(_, provider)| provider.is_enabled())
            .map(|(source, _)| *source)
            .collect()
    }

    /// Snapshot of the current configuration
    #[must_use]
    pub fn config(&self) -> AggregatorConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the configuration and re-derive provider enablement
    pub fn update_config(&self, config: AggregatorConfig) {
        for (source, provider) in &self.providers {
            provider.update_config(ProviderSettingsPatch {
                enabled: Some(config.enabled_providers.contains(source)),
                ..ProviderSettingsPatch::default()
            });
        }
        *self
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Search across every active provider and merge the results.
    ///
    /// # Errors
    ///
    /// Per-provider failures are absorbed into empty results; only a
    /// failure of the merge step itself surfaces, as an aggregation error.
    pub async fn search_foods(
        &self,
        options: &AggregatedSearchOptions,
    ) -> ProviderResult<AggregatedResponse> {
        let config = self.config();
        let page = options.search.page.unwrap_or(1);
        let page_size = options.search.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        let requested = options
            .providers
            .clone()
            .unwrap_or_else(|| config.enabled_providers.clone());
        let active: Vec<Arc<dyn FoodProvider>> = requested
            .iter()
            .filter_map(|source| self.providers.get(source))
            .filter(|provider| provider.is_enabled())
            .cloned()
            .collect();

        if active.is_empty() {
            debug!("no active providers for aggregated search");
            return Ok(AggregatedResponse::empty(page, page_size));
        }

        let calls = active.iter().map(|provider| {
            let source = provider.source();
            let mut provider_options = options.search.clone();
            provider_options.page_size = config
                .default_page_sizes
                .get(&source)
                .copied()
                .or(options.search.page_size)
                .or(Some(DEFAULT_PAGE_SIZE));

            let timeout = config.provider_timeout;
            let provider = Arc::clone(provider);
            async move {
                match tokio::time::timeout(timeout, provider.search_foods(&provider_options)).await
                {
                    Ok(Ok(response)) => response,
                    Ok(Err(err)) => {
                        warn!(source = %source, code = %err.code(), "provider search failed: {err}");
                        ProviderResponse::empty(source, page, page_size)
                    }
                    Err(_) => {
                        warn!(source = %source, timeout_ms = timeout.as_millis() as u64, "provider search timed out");
                        ProviderResponse::empty(source, page, page_size)
                    }
                }
            }
        });

        let results = join_all(calls).await;
        Ok(self.merge_results(&config, options, page, page_size, results))
    }

    /// Fetch one food from the matching provider, absorbing failures.
    ///
    /// Returns `None` when the provider is absent, disabled, errors, or has
    /// no such food.
    pub async fn get_food_by_id(&self, id: &str, source: FoodSource) -> Option<NormalizedFood> {
        let provider = self.provider(source)?;
        if !provider.is_enabled() {
            return None;
        }
        match provider.get_food_by_id(id).await {
            Ok(food) => food,
            Err(err) => {
                warn!(source = %source, code = %err.code(), "get food by id failed: {err}");
                None
            }
        }
    }

    fn merge_results(
        &self,
        config: &AggregatorConfig,
        options: &AggregatedSearchOptions,
        page: u32,
        page_size: u32,
        results: Vec<ProviderResponse>,
    ) -> AggregatedResponse {
        // Collect all foods, tagged with the priority they compete with:
        // explicit per-request override, then provider config, then 0.
        let mut ranked: Vec<RankedFood> = Vec::new();
        for result in results {
            let priority = options
                .provider_priority
                .as_ref()
                .and_then(|overrides| overrides.get(&result.source).copied())
                .or_else(|| self.providers.get(&result.source).map(|p| p.priority()))
                .unwrap_or(0);
            ranked.extend(result.foods.into_iter().map(|food| RankedFood { food, priority }));
        }

        let dedup_enabled = options
            .enable_deduplication
            .unwrap_or(config.deduplication.enabled);
        let deduplicated = if dedup_enabled {
            deduplicate(ranked, config.deduplication.similarity_threshold)
        } else {
            ranked
        };

        let strategy = options.merge_strategy.unwrap_or(config.merge_strategy);
        let mut sorted = sort_by_strategy(deduplicated, strategy);
        sorted.truncate(config.max_results);

        let total_items = sorted.len() as u64;
        let mut source_breakdown: HashMap<FoodSource, u64> = HashMap::new();
        for item in &sorted {
            *source_breakdown.entry(item.food.source).or_insert(0) += 1;
        }

        let start = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
        let foods: Vec<NormalizedFood> = sorted
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .map(|item| item.food)
            .collect();

        AggregatedResponse {
            foods,
            pagination: PageMetadata::exact(page, page_size, total_items),
            source: AGGREGATED_SOURCE,
            stats: AggregationStats {
                total_results: total_items,
                source_breakdown,
            },
        }
    }
}

/// Collapse near-duplicates, keeping the higher-priority member of each
/// duplicate pair regardless of arrival order.
fn deduplicate(foods: Vec<RankedFood>, threshold: f64) -> Vec<RankedFood> {
    let mut accepted: Vec<RankedFood> = Vec::new();
    for candidate in foods {
        let duplicate_of = accepted.iter().position(|existing| {
            food_name_similarity(&candidate.food.name, &existing.food.name) >= threshold
        });
        match duplicate_of {
            None => accepted.push(candidate),
            Some(index) if candidate.priority > accepted[index].priority => {
                accepted[index] = candidate;
            }
            Some(_) => {}
        }
    }
    accepted
}

fn sort_by_strategy(mut foods: Vec<RankedFood>, strategy: MergeStrategy) -> Vec<RankedFood> {
    match strategy {
        MergeStrategy::Priority => {
            foods.sort_by(|a, b| b.priority.cmp(&a.priority));
            foods
        }
        MergeStrategy::SourceGroups => {
            foods.sort_by(|a, b| {
                a.food
                    .source
                    .as_str()
                    .cmp(b.food.source.as_str())
                    .then_with(|| b.priority.cmp(&a.priority))
            });
            foods
        }
        MergeStrategy::Interleave => {
            // Group by source (lexical order), sort each group by priority,
            // then take one from each group per round.
            let mut groups: BTreeMap<&'static str, Vec<RankedFood>> = BTreeMap::new();
            for item in foods {
                groups.entry(item.food.source.as_str()).or_default().push(item);
            }
            for group in groups.values_mut() {
                group.sort_by(|a, b| b.priority.cmp(&a.priority));
            }

            let longest = groups.values().map(Vec::len).max().unwrap_or(0);
            let mut interleaved = Vec::new();
            for index in 0..longest {
                for group in groups.values() {
                    if let Some(item) = group.get(index) {
                        interleaved.push(item.clone());
                    }
                }
            }
            interleaved
        }
    }
}
