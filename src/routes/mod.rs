// ABOUTME: Route module organization for the Forkful HTTP API
// ABOUTME: Food search/provider endpoints and health checks, assembled into one router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::ServerResources;

/// Food search and provider status routes
pub mod foods;
/// Health check and readiness routes
pub mod health;

pub use foods::FoodRoutes;
pub use health::HealthRoutes;

/// Assemble the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(FoodRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
