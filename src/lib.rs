// ABOUTME: Forkful food search server library
// ABOUTME: HTTP routes, configuration, logging, storage, and service wiring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! Forkful — multi-provider food search aggregation server.
//!
//! The server exposes a small HTTP API over the
//! [`forkful_providers::FoodAggregator`]: a food search that fans out to the
//! user's own food database and the USDA FoodData Central API concurrently,
//! and a provider status endpoint. Domain logic lives in the
//! `forkful-core` and `forkful-providers` crates; this crate owns the HTTP
//! boundary, configuration, logging, and the Postgres food store.

/// Environment-driven server configuration
pub mod config;
/// Postgres implementation of the food store
pub mod database;
/// HTTP-boundary error type and response mapping
pub mod errors;
/// Logging configuration and subscriber setup
pub mod logging;
/// HTTP route handlers
pub mod routes;
/// Shared server state wiring providers and the aggregator
pub mod state;

pub use config::environment::ServerConfig;
pub use database::PgFoodStore;
pub use errors::{AppError, AppResult, ErrorCode};
pub use state::ServerResources;
