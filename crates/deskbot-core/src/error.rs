// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Deskbot helpdesk bridge.

use thiserror::Error;

use crate::types::TicketStatus;

/// The primary error type used across Deskbot components.
#[derive(Debug, Error)]
pub enum DeskError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// A transition was requested against an unknown ticket id.
    #[error("ticket not found: {id}")]
    TicketNotFound { id: String },

    /// A transition out of a terminal status was refused.
    #[error("invalid transition for ticket {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: TicketStatus,
        to: TicketStatus,
    },

    /// A non-admin identity attempted an admin-only action.
    #[error("unauthorized action by {actor}")]
    Unauthorized { actor: String },

    /// Channel adapter errors (connection failure, send failure, bad address).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Durable store errors (snapshot read or write failed).
    #[error("persistence error: {message}")]
    Persistence {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}
