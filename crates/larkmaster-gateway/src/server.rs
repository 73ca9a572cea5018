// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use larkmaster_assistant::BotEventHandler;
use larkmaster_core::LarkError;
use larkmaster_tools::ToolRegistry;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub registry: Arc<ToolRegistry>,
    pub events: Arc<BotEventHandler>,
    pub auth: AuthConfig,
    /// Process start, for uptime.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(registry: Arc<ToolRegistry>, events: Arc<BotEventHandler>, auth: AuthConfig) -> Self {
        Self {
            registry,
            events,
            auth,
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration (mirrors `GatewayConfig` from larkmaster-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the gateway router.
///
/// - GET /health and POST /webhook are public
/// - GET /tools and POST /call sit behind the bearer middleware when a
///   token is configured
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/webhook", post(handlers::post_webhook))
        .with_state(state.clone());

    let tool_routes = Router::new()
        .route("/tools", get(handlers::get_tools))
        .route("/call", post(handlers::post_call))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(tool_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds `host:port` and serves until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), LarkError> {
    if !state.auth.enabled() {
        tracing::warn!("gateway bearer token not set, /tools and /call are unauthenticated");
    }
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LarkError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| LarkError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }
}
