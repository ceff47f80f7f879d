// ABOUTME: REST client for the USDA FoodData Central API
// ABOUTME: Search, get-by-id, and batched lookup with rate limiting and typed error translation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! USDA FoodData Central API client.
//!
//! Wraps the FDC REST API behind a [`SlidingWindowLimiter`]: both the
//! per-minute and per-hour quotas are checked before every outbound call, so
//! an exhausted window fails fast without a wasted round-trip. Non-2xx
//! responses are translated into typed provider errors carrying the HTTP
//! status; transient transport failures are retried with backoff before
//! being wrapped.
//!
//! # API Reference
//! USDA FoodData Central API: <https://fdc.nal.usda.gov/api-guide.html>

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::errors::provider::{ProviderError, ProviderResult};
use crate::fdc::models::{FdcBatchRequest, FdcFood, FdcSearchRequest, FdcSearchResponse};
use crate::fdc::rate_limit::{
    SlidingWindowLimiter, DEFAULT_REQUESTS_PER_HOUR, DEFAULT_REQUESTS_PER_MINUTE,
};
use crate::http_client::shared_client;
use crate::models::food::FoodSource;
use crate::pagination::MAX_PAGE_SIZE;
use crate::retry::{send_with_retry, RetryConfig};

/// Default base URL for the FoodData Central API
pub const FDC_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

/// Upstream cap on ids per batched lookup request
pub const MAX_IDS_PER_BATCH: usize = 20;

/// Delay between batch chunks, to stay inside burst limits
const BATCH_CHUNK_DELAY: Duration = Duration::from_millis(100);

/// Data types requested when the caller does not specify any
const DEFAULT_DATA_TYPES: [&str; 3] = ["Foundation", "SR Legacy", "Branded"];

/// Default upstream sort field
const DEFAULT_SORT_BY: &str = "dataType.keyword";

/// FDC client configuration
#[derive(Debug, Clone)]
pub struct FdcClientConfig {
    /// API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: String,
    /// Base URL for the FDC API
    pub base_url: String,
    /// Requests allowed per rolling minute
    pub requests_per_minute: u32,
    /// Requests allowed per rolling hour
    pub requests_per_hour: u32,
}

impl FdcClientConfig {
    /// Configuration with default URL and quotas for the given key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: FDC_BASE_URL.to_owned(),
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            requests_per_hour: DEFAULT_REQUESTS_PER_HOUR,
        }
    }
}

/// Parameters for a food search against the FDC API
#[derive(Debug, Clone)]
pub struct FdcSearchParams {
    /// Free-text query
    pub query: String,
    /// 1-based page number
    pub page_number: u32,
    /// Items per page (capped at the upstream maximum)
    pub page_size: u32,
    /// Data types to include; empty means the default set
    pub data_types: Vec<String>,
    /// Upstream sort field
    pub sort_by: Option<String>,
    /// Sort direction
    pub sort_order: Option<String>,
}

impl FdcSearchParams {
    /// Search parameters for a query with defaults for everything else
    #[must_use]
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page_number: 1,
            page_size: 25,
            data_types: Vec::new(),
            sort_by: None,
            sort_order: None,
        }
    }
}

/// Client for the USDA FoodData Central API
#[derive(Debug)]
pub struct FdcClient {
    config: FdcClientConfig,
    limiter: Mutex<SlidingWindowLimiter>,
    retry: RetryConfig,
}

impl FdcClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::MissingApiKey`] when the key is empty.
    pub fn new(config: FdcClientConfig) -> ProviderResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey {
                provider: FoodSource::FdcUsda,
            });
        }
        let limiter =
            SlidingWindowLimiter::new(config.requests_per_minute, config.requests_per_hour);
        Ok(Self {
            config,
            limiter: Mutex::new(limiter),
            retry: RetryConfig::default(),
        })
    }

    /// Register one outbound request against both quota windows.
    ///
    /// # Errors
    ///
    /// Fails with a rate limit error when a window is exhausted; no network
    /// call is made in that case.
    pub fn check_rate_limit(&self) -> ProviderResult<()> {
        self.limiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .check_and_record()
    }

    /// Search for foods.
    ///
    /// # Errors
    ///
    /// Fails with a rate limit error before the call, an `HTTP_{status}`
    /// error on a non-2xx response, or a search error on transport or parse
    /// failure.
    pub async fn search_foods(&self, params: &FdcSearchParams) -> ProviderResult<FdcSearchResponse> {
        self.check_rate_limit()?;

        let data_type = if params.data_types.is_empty() {
            DEFAULT_DATA_TYPES.iter().map(|&s| s.to_owned()).collect()
        } else {
            params.data_types.clone()
        };
        let body = FdcSearchRequest {
            query: params.query.clone(),
            data_type,
            page_size: params.page_size.min(MAX_PAGE_SIZE),
            page_number: params.page_number,
            sort_by: params
                .sort_by
                .clone()
                .unwrap_or_else(|| DEFAULT_SORT_BY.to_owned()),
            sort_order: params.sort_order.clone().unwrap_or_else(|| "asc".to_owned()),
            brand_owner: String::new(),
        };

        let url = format!("{}/foods/search", self.config.base_url);
        debug!(query = %params.query, page = params.page_number, "FDC food search");
        let response = send_with_retry(&self.retry, "fdc", || {
            shared_client()
                .post(&url)
                .header("X-Api-Key", &self.config.api_key)
                .json(&body)
        })
        .await
        .map_err(|err| Self::search_error(format!("request failed: {err}")))?;

        let response = Self::ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|err| Self::search_error(format!("invalid response payload: {err}")))
    }

    /// Fetch one food by FDC id. Returns `Ok(None)` on an upstream 404.
    ///
    /// # Errors
    ///
    /// Fails with a rate limit error before the call, an `HTTP_{status}`
    /// error on any other non-2xx response, or a get-by-id error on
    /// transport or parse failure.
    pub async fn get_food_by_id(&self, fdc_id: u64) -> ProviderResult<Option<FdcFood>> {
        self.check_rate_limit()?;

        let url = format!("{}/food/{fdc_id}", self.config.base_url);
        let response = send_with_retry(&self.retry, "fdc", || {
            shared_client()
                .get(&url)
                .query(&[("format", "full"), ("api_key", self.config.api_key.as_str())])
        })
        .await
        .map_err(|err| Self::get_by_id_error(format!("request failed: {err}")))?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let response = Self::ensure_success(response).await?;
        let food = response
            .json()
            .await
            .map_err(|err| Self::get_by_id_error(format!("invalid response payload: {err}")))?;
        Ok(Some(food))
    }

    /// Fetch multiple foods by FDC id, chunked to the upstream per-request
    /// cap with a small delay between chunks.
    ///
    /// # Errors
    ///
    /// Fails with a rate limit error before any chunk, or an `HTTP_{status}`
    /// / search error from the first failing chunk.
    pub async fn get_foods_by_ids(&self, fdc_ids: &[u64]) -> ProviderResult<Vec<FdcFood>> {
        if fdc_ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/foods", self.config.base_url);
        let chunks: Vec<&[u64]> = fdc_ids.chunks(MAX_IDS_PER_BATCH).collect();
        let chunk_count = chunks.len();
        let mut results = Vec::with_capacity(fdc_ids.len());

        for chunk in chunks {
            self.check_rate_limit()?;

            let body = FdcBatchRequest {
                fdc_ids: chunk.to_vec(),
                format: "abridged".to_owned(),
            };
            let response = send_with_retry(&self.retry, "fdc", || {
                shared_client()
                    .post(&url)
                    .header("X-Api-Key", &self.config.api_key)
                    .json(&body)
            })
            .await
            .map_err(|err| Self::search_error(format!("batch request failed: {err}")))?;

            let response = Self::ensure_success(response).await?;
            let foods: Vec<FdcFood> = response
                .json()
                .await
                .map_err(|err| Self::search_error(format!("invalid batch payload: {err}")))?;
            results.extend(foods);

            if chunk_count > 1 {
                tokio::time::sleep(BATCH_CHUNK_DELAY).await;
            }
        }

        Ok(results)
    }

    /// Probe whether the configured API key is accepted upstream.
    ///
    /// # Errors
    ///
    /// Propagates any failure other than an HTTP 401/403, which map to
    /// `Ok(false)`.
    pub async fn validate_api_key(&self) -> ProviderResult<bool> {
        let mut params = FdcSearchParams::for_query("apple");
        params.page_size = 1;
        match self.search_foods(&params).await {
            Ok(_) => Ok(true),
            Err(ProviderError::Http { status, .. }) if status == 401 || status == 403 => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn ensure_success(response: reqwest::Response) -> ProviderResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::Http {
            provider: FoodSource::FdcUsda,
            status: status.as_u16(),
            body,
        })
    }

    fn search_error(message: String) -> ProviderError {
        ProviderError::Search {
            provider: FoodSource::FdcUsda,
            message,
        }
    }

    fn get_by_id_error(message: String) -> ProviderError {
        ProviderError::GetById {
            provider: FoodSource::FdcUsda,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        let err = FdcClient::new(FdcClientConfig::new("")).unwrap_err();
        assert_eq!(err.code(), "MISSING_API_KEY");
    }

    #[test]
    fn rate_limit_fails_fast_without_network() {
        let mut config = FdcClientConfig::new("test-key");
        config.requests_per_minute = 2;
        let client = FdcClient::new(config).unwrap();

        client.check_rate_limit().unwrap();
        client.check_rate_limit().unwrap();
        let err = client.check_rate_limit().unwrap_err();
        assert_eq!(err.code(), "RATE_LIMIT_MINUTE");
    }
}
