// ABOUTME: Shared server state wiring the food store, providers, and aggregator
// ABOUTME: Built once at startup and injected into handlers as axum state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use std::sync::Arc;

use tracing::{info, warn};

use forkful_providers::aggregator::{AggregatorConfig, FoodAggregator};
use forkful_providers::fdc::client::{FdcClient, FdcClientConfig};
use forkful_providers::fdc::provider::FdcFoodProvider;
use forkful_providers::internal::InternalFoodProvider;
use forkful_providers::store::FoodStore;

use crate::config::environment::ServerConfig;

/// Everything request handlers need, constructed once at process start.
///
/// The aggregator is an explicit injected instance; there is no global
/// singleton, and nothing outside this struct reaches into its provider map.
pub struct ServerResources {
    /// Server configuration snapshot
    pub config: ServerConfig,
    /// The aggregation service over all registered providers
    pub aggregator: FoodAggregator,
}

impl ServerResources {
    /// Wire providers and the aggregator over the given food store.
    ///
    /// The internal provider is always registered. The FDC provider is
    /// registered only when an API key is configured; without one the
    /// external source is simply unavailable and searches degrade to
    /// internal-only results.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn FoodStore>) -> Self {
        let aggregator_config = AggregatorConfig {
            provider_timeout: config.provider_timeout,
            ..AggregatorConfig::default()
        };
        let mut aggregator = FoodAggregator::new(aggregator_config);

        aggregator.register_provider(Arc::new(InternalFoodProvider::new(store)));

        match &config.fdc.api_key {
            Some(api_key) => {
                let mut client_config = FdcClientConfig::new(api_key.clone());
                if let Some(base_url) = &config.fdc.base_url {
                    client_config.base_url = base_url.clone();
                }
                if let Some(per_minute) = config.fdc.requests_per_minute {
                    client_config.requests_per_minute = per_minute;
                }
                if let Some(per_hour) = config.fdc.requests_per_hour {
                    client_config.requests_per_hour = per_hour;
                }

                match FdcClient::new(client_config) {
                    Ok(client) => {
                        aggregator.register_provider(Arc::new(FdcFoodProvider::new(client)));
                    }
                    Err(err) => {
                        warn!("FDC provider unavailable: {err}");
                    }
                }
            }
            None => {
                info!("no FDC API key configured, external food search disabled");
            }
        }

        Self { config, aggregator }
    }
}
