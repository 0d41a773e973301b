// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Deskbot workspace.
//!
//! The wire representation (dashboard feed and JSON snapshots) uses
//! camelCase field names and SCREAMING_SNAKE_CASE enum tags, matching the
//! dashboard's expectations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Fixed set of support request categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCategory {
    HardwareReplacement,
    SoftwareInstallation,
    TechnicalSupport,
    Repair,
}

impl TicketCategory {
    /// All categories in keyboard order.
    pub const ALL: [TicketCategory; 4] = [
        TicketCategory::HardwareReplacement,
        TicketCategory::SoftwareInstallation,
        TicketCategory::TechnicalSupport,
        TicketCategory::Repair,
    ];

    /// Human-readable label shown on the category keyboard.
    ///
    /// The chat flow matches button presses back to a category by this
    /// exact text, so the label doubles as the parse key.
    pub fn label(&self) -> &'static str {
        match self {
            TicketCategory::HardwareReplacement => "Hardware replacement",
            TicketCategory::SoftwareInstallation => "Software installation",
            TicketCategory::TechnicalSupport => "Technical support",
            TicketCategory::Repair => "Repair",
        }
    }

    /// Resolves a keyboard button text back to its category.
    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == text)
    }
}

/// Lifecycle status of a ticket.
///
/// PENDING is the only initial status; COMPLETED and REJECTED are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Pending,
    InProgress,
    Completed,
    Rejected,
}

impl TicketStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Completed | TicketStatus::Rejected)
    }
}

/// A single support request with its lifecycle status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Opaque unique id, time-derived and strictly increasing per registry.
    pub id: String,
    /// External identity of the requesting chat user.
    pub requester_id: String,
    /// Display name captured at creation (handle, falling back to name).
    pub requester_name: String,
    pub category: TicketCategory,
    pub description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An identity registered to receive admin notifications.
///
/// The subscriber registry is keyed by `handle`; re-adding a handle
/// overwrites the prior record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: String,
    /// Channel-level username used for authorization checks.
    pub handle: String,
    /// Destination the channel adapter delivers messages to.
    pub channel_address: String,
    /// Only admin subscribers receive notifications and may act on tickets.
    pub is_admin: bool,
}

/// Channel-level identity of an incoming chat event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatIdentity {
    /// Stable user id on the chat platform.
    pub user_id: String,
    /// Platform username, if the user has one.
    pub handle: Option<String>,
    /// Display name, used when no handle exists.
    pub display_name: Option<String>,
    /// Address the adapter uses to message this user back.
    pub address: String,
}

impl ChatIdentity {
    /// Requester name captured on tickets: handle first, then display
    /// name, then the raw user id.
    pub fn requester_name(&self) -> String {
        self.handle
            .clone()
            .or_else(|| self.display_name.clone())
            .unwrap_or_else(|| self.user_id.clone())
    }

    /// Whether this identity carries the given handle.
    pub fn has_handle(&self, handle: &str) -> bool {
        self.handle
            .as_deref()
            .is_some_and(|h| h.eq_ignore_ascii_case(handle))
    }
}

/// A single inline action button (label plus opaque action id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub label: String,
    pub action_id: String,
}

/// Interactive controls attached to an outgoing chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSet {
    /// Reply keyboard: rows of plain buttons echoed back as text messages.
    Buttons(Vec<Vec<String>>),
    /// Inline actions: rows of labeled callbacks carrying an action id.
    Actions(Vec<Vec<Action>>),
}
