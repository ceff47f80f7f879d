// ABOUTME: Retry helper for transient transport failures on provider API calls
// ABOUTME: Exponential backoff over rebuilt requests; typed provider errors are never retried
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use std::time::Duration;

use tracing::warn;

/// Configuration for transient-failure retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Additional attempts after the first failure
    pub max_retries: u32,
    /// Initial backoff delay, doubled per retry
    pub initial_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

/// Send a request, retrying transient transport failures.
///
/// Only connect and timeout errors are retried; any HTTP response, including
/// non-2xx statuses, is returned to the caller for translation into a typed
/// provider error (which is never retried).
///
/// # Errors
///
/// Returns the last transport error once retries are exhausted, or the first
/// non-transient transport error immediately.
pub async fn send_with_retry<F>(
    config: &RetryConfig,
    provider_name: &str,
    build: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    let mut attempt: u32 = 0;
    loop {
        match build().send().await {
            Ok(response) => return Ok(response),
            Err(err) if attempt < config.max_retries && (err.is_timeout() || err.is_connect()) => {
                attempt += 1;
                let backoff = config.initial_backoff * 2_u32.pow(attempt - 1);
                warn!(
                    provider = provider_name,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "transient transport failure, retrying: {err}"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}
