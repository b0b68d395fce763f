// SPDX-FileCopyrightText: 2026 Carthub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the REST API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use carthub_core::{CarthubError, FleetStore};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Persistence backend; all handlers go through this trait object.
    pub store: Arc<dyn FleetStore>,
}

/// Gateway server configuration (mirrors ServerConfig from carthub-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the full API router.
///
/// Split out from [`start_server`] so tests can drive the router directly
/// with `tower::ServiceExt` instead of binding a socket.
pub fn build_router(state: GatewayState) -> Router {
    let cart_routes = Router::new()
        .route(
            "/carts",
            get(handlers::carts::list_carts).post(handlers::carts::create_cart),
        )
        .route(
            "/carts/bulk",
            post(handlers::carts::bulk_create).delete(handlers::carts::delete_all),
        )
        .route(
            "/carts/{id}",
            put(handlers::carts::update_cart).delete(handlers::carts::delete_cart),
        )
        .route(
            "/carts/{id}/assign/{person_id}",
            post(handlers::carts::assign_person),
        )
        .route(
            "/carts/{id}/unassign/{person_id}",
            post(handlers::carts::unassign_person),
        )
        .route("/carts/{id}/return", post(handlers::carts::return_cart))
        .route("/carts/{id}/time", put(handlers::carts::update_return_time));

    let person_routes = Router::new()
        .route(
            "/persons",
            get(handlers::persons::list_persons).post(handlers::persons::create_person),
        )
        .route(
            "/persons/{id}",
            get(handlers::persons::get_person)
                .put(handlers::persons::update_person)
                .delete(handlers::persons::delete_person),
        );

    let history_routes = Router::new()
        .route(
            "/cart-history",
            get(handlers::history::list_history).post(handlers::history::create_entry),
        )
        .route("/cart-history/{id}", get(handlers::history::for_cart))
        .route(
            "/cart-history/person/{person_id}",
            get(handlers::history::for_person),
        )
        .route(
            "/cart-history/{id}/return",
            put(handlers::history::record_return),
        );

    Router::new()
        .route("/health", get(handlers::get_health))
        .merge(cart_routes)
        .merge(person_routes)
        .merge(history_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), CarthubError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CarthubError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| CarthubError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
