// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-requester conversation session tracker.
//!
//! A tiny two-state machine per requester: IDLE until a category is
//! chosen, then AWAITING_DESCRIPTION until the description arrives and the
//! session is consumed. Sessions are intentionally volatile: never
//! persisted, gone on restart.

use std::collections::HashMap;

use deskbot_core::TicketCategory;

/// Where a requester currently is in the ticket-creation dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    AwaitingDescription,
}

/// Tracks the ticket-creation dialogue step of every active requester.
///
/// Each requester's conversation is logically single-threaded (one chat at
/// a time per user), so the tracker itself needs no interior locking; the
/// desk service serializes access.
#[derive(Debug, Default)]
pub struct SessionTracker {
    pending: HashMap<String, TicketCategory>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, requester_id: &str) -> Stage {
        if self.pending.contains_key(requester_id) {
            Stage::AwaitingDescription
        } else {
            Stage::Idle
        }
    }

    /// Records a chosen category and moves to AWAITING_DESCRIPTION.
    /// Idempotent: re-choosing simply overwrites the pending category.
    pub fn category_chosen(&mut self, requester_id: &str, category: TicketCategory) {
        self.pending.insert(requester_id.to_string(), category);
    }

    /// Consumes the pending session if one is awaiting a description.
    ///
    /// Returns the captured category paired with the text, or `None` when
    /// the requester is idle (the message is not part of ticket creation).
    pub fn take_description(
        &mut self,
        requester_id: &str,
        text: &str,
    ) -> Option<(TicketCategory, String)> {
        self.pending
            .remove(requester_id)
            .map(|category| (category, text.to_string()))
    }

    /// Drops any pending session for the requester.
    pub fn clear(&mut self, requester_id: &str) {
        self.pending.remove(requester_id);
    }
}
