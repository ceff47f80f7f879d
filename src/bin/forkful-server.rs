// ABOUTME: Forkful server entry point
// ABOUTME: Parses flags and environment, wires the store and providers, serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use forkful::config::environment::ServerConfig;
use forkful::database::PgFoodStore;
use forkful::logging::{self, LogFormat};
use forkful::routes;
use forkful::state::ServerResources;
use forkful_providers::http_client::initialize_shared_client;
use forkful_providers::store::{FoodStore, MemoryFoodStore};

/// Forkful food search aggregation server
#[derive(Debug, Parser)]
#[command(name = "forkful-server", version, about)]
struct Args {
    /// HTTP listen port (overrides FORKFUL_HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Log output format: pretty, compact, or json
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = args
        .log_format
        .as_deref()
        .map_or_else(LogFormat::from_env, LogFormat::parse);
    logging::init(format);

    let mut config = ServerConfig::from_env();
    if let Some(port) = args.port {
        config.http_port = port;
    }

    initialize_shared_client(config.http_timeout_secs, config.http_connect_timeout_secs);

    let store: Arc<dyn FoodStore> = match &config.database_url {
        Some(url) => {
            let store = PgFoodStore::connect(url)
                .await
                .context("failed to connect to the food database")?;
            store
                .run_migrations()
                .await
                .context("failed to apply database migrations")?;
            info!("connected to Postgres food store");
            Arc::new(store)
        }
        None => {
            warn!("no DATABASE_URL configured, using an in-memory food store");
            Arc::new(MemoryFoodStore::new())
        }
    };

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(config, store));
    let app = routes::router(resources);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("forkful server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to install ctrl-c handler, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
