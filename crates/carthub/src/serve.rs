// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `carthub serve` command implementation.
//!
//! Opens the SQLite fleet store and runs the REST gateway until the
//! process is stopped.

use std::sync::Arc;

use tracing::info;

use carthub_config::model::CarthubConfig;
use carthub_core::{CarthubError, FleetStore};
use carthub_gateway::{GatewayState, ServerConfig, start_server};
use carthub_storage::SqliteFleet;

pub async fn run_serve(config: CarthubConfig) -> Result<(), CarthubError> {
    init_tracing(&config.server.log_level);

    let store = SqliteFleet::new(config.storage.clone(), &config.fleet);
    store.initialize().await?;
    info!(
        database = %config.storage.database_path,
        window_hours = config.fleet.checkout_window_hours,
        cap = config.fleet.assignment_cap,
        "fleet store ready"
    );

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let state = GatewayState {
        store: Arc::new(store),
    };

    start_server(&server_config, state).await
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("carthub={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
