// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket dashboard gateway for the Deskbot helpdesk bridge.
//!
//! Serves the live dashboard feed over `/ws` (snapshot on connect, then
//! incremental events), REST routes for ticket and subscriber inspection,
//! and the bot start/stop control endpoints.

pub mod handlers;
pub mod server;
pub mod ws;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
