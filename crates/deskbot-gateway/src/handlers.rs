// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles bot start/stop control, ticket listing, subscriber management,
//! and the health probe.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use deskbot_core::{Subscriber, Ticket};

use crate::server::GatewayState;

/// Response body for the bot control endpoints.
#[derive(Debug, Serialize)]
pub struct BotControlResponse {
    /// Whether the call changed anything.
    pub success: bool,
    /// Resulting bot state, `"started"` or `"stopped"`.
    pub status: &'static str,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub bot_running: bool,
}

/// Request body for POST /subscribers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberRequest {
    pub handle: String,
    pub channel_address: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        bot_running: state.service.is_running(),
    })
}

/// GET /requests
pub async fn get_requests(State(state): State<GatewayState>) -> Json<Vec<Ticket>> {
    Json(state.service.list_tickets().await)
}

/// GET /subscribers
pub async fn get_subscribers(State(state): State<GatewayState>) -> Json<Vec<Subscriber>> {
    Json(state.service.list_subscribers().await)
}

/// POST /subscribers
///
/// Registers (or overwrites, by handle) a notification subscriber.
pub async fn post_subscriber(
    State(state): State<GatewayState>,
    Json(body): Json<SubscriberRequest>,
) -> Response {
    if body.handle.trim().is_empty() || body.channel_address.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "handle and channelAddress must be non-empty".into(),
            }),
        )
            .into_response();
    }
    let subscriber = state
        .service
        .add_subscriber(body.handle.trim(), body.channel_address.trim(), body.is_admin)
        .await;
    (StatusCode::CREATED, Json(subscriber)).into_response()
}

/// DELETE /subscribers/{id}
pub async fn delete_subscriber(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Response {
    if state.service.remove_subscriber(&id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no subscriber with id {id}"),
            }),
        )
            .into_response()
    }
}

/// POST /bot/start
pub async fn post_bot_start(State(state): State<GatewayState>) -> Json<BotControlResponse> {
    let success = state.service.start().await;
    Json(BotControlResponse {
        success,
        status: "started",
    })
}

/// POST /bot/stop
pub async fn post_bot_stop(State(state): State<GatewayState>) -> Json<BotControlResponse> {
    let success = state.service.stop().await;
    Json(BotControlResponse {
        success,
        status: "stopped",
    })
}
