// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core trait definitions, error types, and domain types for the Deskbot
//! helpdesk bridge.
//!
//! Everything channel- and transport-agnostic lives here: the ticket and
//! subscriber model, the status state machine vocabulary, the live-view
//! event envelope, and the [`MessagingChannel`] seam that chat platform
//! adapters implement.

pub mod channel;
pub mod error;
pub mod events;
pub mod types;

pub use channel::MessagingChannel;
pub use error::DeskError;
pub use events::{BotState, DeskEvent, ObserverCommand};
pub use types::{
    Action, ActionSet, ChatIdentity, Subscriber, Ticket, TicketCategory, TicketStatus,
};
