// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. The gateway is an
//! operator console and binds to loopback by default; none of the routes
//! carry authentication.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use deskbot_core::DeskError;
use deskbot_desk::DeskService;

use crate::handlers;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The desk service every route operates on.
    pub service: Arc<DeskService>,
}

/// Gateway server configuration (mirrors GatewayConfig from deskbot-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the gateway router over the given state.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/requests", get(handlers::get_requests))
        .route("/subscribers", get(handlers::get_subscribers))
        .route("/subscribers", post(handlers::post_subscriber))
        .route("/subscribers/{id}", delete(handlers::delete_subscriber))
        .route("/bot/start", post(handlers::post_bot_start))
        .route("/bot/stop", post(handlers::post_bot_stop))
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the gateway HTTP/WebSocket server.
///
/// Binds to the configured host:port and serves until the task is
/// cancelled.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), DeskError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DeskError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| DeskError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use deskbot_core::{ActionSet, MessagingChannel};
    use deskbot_storage::SnapshotStore;

    struct NullChannel;

    #[async_trait]
    impl MessagingChannel for NullChannel {
        fn name(&self) -> &str {
            "null"
        }

        async fn send_message(
            &self,
            _address: &str,
            _text: &str,
            _actions: Option<ActionSet>,
        ) -> Result<(), DeskError> {
            Ok(())
        }
    }

    /// Builds a started service over a temp snapshot directory.
    pub(crate) async fn test_state() -> (GatewayState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let service = Arc::new(DeskService::new(store, Arc::new(NullChannel), None));
        service.start().await;
        (GatewayState { service }, dir)
    }

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }

    #[tokio::test]
    async fn router_builds_over_state() {
        let (state, _dir) = test_state().await;
        let _router = build_router(state.clone());
        let _cloned = state;
    }
}
