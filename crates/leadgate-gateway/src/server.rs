// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. [`build_router`] is public
//! so integration tests can drive the router without binding a socket.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use leadgate_core::LeadgateError;
use leadgate_delivery::Deliverer;
use leadgate_storage::Database;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{bearer_auth_middleware, AuthSettings};
use crate::{handlers, webhook};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub db: Database,
    pub auth: AuthSettings,
    pub deliverer: Arc<Deliverer>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

/// Bind address for the server (mirrors ServerConfig from leadgate-config).
#[derive(Debug, Clone)]
pub struct BindConfig {
    pub host: String,
    pub port: u16,
}

/// Assemble the full route tree.
///
/// Three tiers:
/// - `/health` is public;
/// - webhooks authenticate via the body secret inside the handler;
/// - the lead API sits behind bearer-token middleware.
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let webhook_routes = Router::new()
        .route("/v1/webhooks/purchase", post(webhook::purchase))
        .route(
            "/v1/webhooks/purchase/by-product-id",
            post(webhook::purchase_by_product_id),
        )
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/v1/leads",
            post(handlers::create_lead).patch(handlers::update_lead),
        )
        .route("/v1/leads/deliver", post(handlers::create_lead_with_delivery))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            bearer_auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn start_server(config: &BindConfig, state: GatewayState) -> Result<(), LeadgateError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| LeadgateError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| LeadgateError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
