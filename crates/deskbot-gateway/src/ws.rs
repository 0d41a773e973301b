// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket handler for the live dashboard feed.
//!
//! Server -> Client (JSON, tagged by `type`):
//! ```json
//! {"type": "INIT", "tickets": [...], "botState": {"isRunning": true}}
//! {"type": "NEW_REQUEST", "ticket": {...}}
//! {"type": "UPDATE_REQUEST", "ticket": {...}}
//! ```
//!
//! Client -> Server (JSON):
//! ```json
//! {"type": "UPDATE_REQUEST_STATUS", "ticketId": "...", "status": "COMPLETED"}
//! ```

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use deskbot_core::ObserverCommand;

use crate::server::GatewayState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<GatewayState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handles an individual dashboard connection.
///
/// On connect the observer is attached to the desk service, which seeds
/// the outbound channel with the INIT snapshot before any live event can
/// be interleaved. A sender task then forwards events to the socket while
/// this loop reads status commands from the client.
async fn handle_socket(socket: WebSocket, state: GatewayState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let observer_id = uuid::Uuid::new_v4().to_string();

    let (tx, mut rx) = mpsc::channel::<String>(64);
    state.service.attach_observer(&observer_id, tx).await;
    debug!(observer_id, "dashboard observer connected");

    let sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if ws_sender.send(Message::Text(event.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => {
                let text_str: &str = &text;
                let command: ObserverCommand = match serde_json::from_str(text_str) {
                    Ok(v) => v,
                    Err(e) => {
                        warn!(observer_id, "invalid dashboard command: {e}");
                        continue;
                    }
                };

                let ObserverCommand::UpdateRequestStatus { ticket_id, status } = command;
                if let Err(error) = state
                    .service
                    .update_status_from_observer(&ticket_id, status)
                    .await
                {
                    warn!(observer_id, %ticket_id, %error, "dashboard status update refused");
                }
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary, ping (handled by tungstenite layer)
        }
    }

    state.service.detach_observer(&observer_id);
    sender_task.abort();
    debug!(observer_id, "dashboard observer disconnected");
}
