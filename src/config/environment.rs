// ABOUTME: Environment-variable configuration for the Forkful server
// ABOUTME: Port, database URL, FDC credentials and quotas, timeouts; defaults for everything else
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! Environment-only server configuration.
//!
//! Every knob is an environment variable with a sensible default. A missing
//! `FDC_API_KEY` is not an error: the external provider simply stays
//! unavailable and searches return internal-only results.

use std::env;
use std::time::Duration;

use tracing::warn;

/// Environment variable names consumed by the server
pub mod env_keys {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "FORKFUL_HTTP_PORT";
    /// Postgres connection URL for the internal food store
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// USDA FoodData Central API key; absent means the provider is unavailable
    pub const FDC_API_KEY: &str = "FDC_API_KEY";
    /// Override for the FDC base URL
    pub const FDC_BASE_URL: &str = "FDC_BASE_URL";
    /// FDC requests allowed per rolling minute
    pub const FDC_REQUESTS_PER_MINUTE: &str = "FDC_REQUESTS_PER_MINUTE";
    /// FDC requests allowed per rolling hour
    pub const FDC_REQUESTS_PER_HOUR: &str = "FDC_REQUESTS_PER_HOUR";
    /// Per-provider timeout during aggregated fan-out, in seconds
    pub const PROVIDER_TIMEOUT_SECS: &str = "FORKFUL_PROVIDER_TIMEOUT_SECS";
    /// Outbound HTTP request timeout, in seconds
    pub const HTTP_TIMEOUT_SECS: &str = "FORKFUL_HTTP_TIMEOUT_SECS";
    /// Outbound HTTP connect timeout, in seconds
    pub const HTTP_CONNECT_TIMEOUT_SECS: &str = "FORKFUL_HTTP_CONNECT_TIMEOUT_SECS";
}

/// Default HTTP listen port
const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default per-provider timeout in seconds
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;
/// Default outbound request timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Default outbound connect timeout in seconds
const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the FoodData Central provider
#[derive(Debug, Clone)]
pub struct FdcSettings {
    /// API key; `None` leaves the provider unregistered
    pub api_key: Option<String>,
    /// Base URL override, when set
    pub base_url: Option<String>,
    /// Requests allowed per rolling minute, when overridden
    pub requests_per_minute: Option<u32>,
    /// Requests allowed per rolling hour, when overridden
    pub requests_per_hour: Option<u32>,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Postgres URL; `None` falls back to the in-memory store
    pub database_url: Option<String>,
    /// FDC provider settings
    pub fdc: FdcSettings,
    /// Per-provider timeout during aggregated fan-out
    pub provider_timeout: Duration,
    /// Outbound HTTP request timeout in seconds
    pub http_timeout_secs: u64,
    /// Outbound HTTP connect timeout in seconds
    pub http_connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            database_url: None,
            fdc: FdcSettings {
                api_key: None,
                base_url: None,
                requests_per_minute: None,
                requests_per_hour: None,
            },
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            http_connect_timeout_secs: DEFAULT_HTTP_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment, applying defaults.
    ///
    /// Unparsable numeric values are warned about and replaced by the
    /// default rather than failing startup.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            http_port: parse_env(env_keys::HTTP_PORT).unwrap_or(DEFAULT_HTTP_PORT),
            database_url: non_empty_env(env_keys::DATABASE_URL),
            fdc: FdcSettings {
                api_key: non_empty_env(env_keys::FDC_API_KEY),
                base_url: non_empty_env(env_keys::FDC_BASE_URL),
                requests_per_minute: parse_env(env_keys::FDC_REQUESTS_PER_MINUTE),
                requests_per_hour: parse_env(env_keys::FDC_REQUESTS_PER_HOUR),
            },
            provider_timeout: Duration::from_secs(
                parse_env(env_keys::PROVIDER_TIMEOUT_SECS)
                    .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS),
            ),
            http_timeout_secs: parse_env(env_keys::HTTP_TIMEOUT_SECS)
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            http_connect_timeout_secs: parse_env(env_keys::HTTP_CONNECT_TIMEOUT_SECS)
                .unwrap_or(DEFAULT_HTTP_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Whether the external FDC provider can be initialized
    #[must_use]
    pub fn fdc_available(&self) -> bool {
        self.fdc.api_key.is_some()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = non_empty_env(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "unparsable environment value, using default");
            None
        }
    }
}
