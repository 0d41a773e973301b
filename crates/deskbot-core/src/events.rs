// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live-view feed envelope.
//!
//! Server -> observer (JSON):
//! ```json
//! {"type": "INIT", "tickets": [...], "botState": {"isRunning": true}}
//! {"type": "NEW_REQUEST", "ticket": {...}}
//! {"type": "UPDATE_REQUEST", "ticket": {...}}
//! ```
//!
//! Observer -> server (JSON):
//! ```json
//! {"type": "UPDATE_REQUEST_STATUS", "ticketId": "...", "status": "IN_PROGRESS"}
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Ticket, TicketStatus};

/// Whether the chat bot side of the bridge is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotState {
    pub is_running: bool,
}

/// Event pushed to every connected dashboard observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeskEvent {
    /// Full snapshot, sent once per new observer connection.
    #[serde(rename = "INIT")]
    Init {
        tickets: Vec<Ticket>,
        #[serde(rename = "botState")]
        bot_state: BotState,
    },

    /// A ticket was created.
    #[serde(rename = "NEW_REQUEST")]
    NewRequest { ticket: Ticket },

    /// A ticket's status changed.
    #[serde(rename = "UPDATE_REQUEST")]
    UpdateRequest { ticket: Ticket },
}

/// Command received from a dashboard observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObserverCommand {
    /// Request a status transition, exactly like an admin action.
    #[serde(rename = "UPDATE_REQUEST_STATUS", rename_all = "camelCase")]
    UpdateRequestStatus {
        ticket_id: String,
        status: TicketStatus,
    },
}
