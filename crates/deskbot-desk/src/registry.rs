// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The canonical ticket and subscriber collections and the status state
//! machine.
//!
//! The registry is plain in-memory state; persistence and broadcast are
//! sequenced by [`crate::service::DeskService`], which is also the only
//! component mutating a registry instance.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use deskbot_core::{DeskError, Subscriber, Ticket, TicketCategory, TicketStatus};

/// Owns the canonical set of tickets and notification subscribers.
#[derive(Debug, Default)]
pub struct TicketRegistry {
    /// Tickets in creation order.
    tickets: Vec<Ticket>,
    /// Ticket id -> position in `tickets`.
    index: HashMap<String, usize>,
    /// Requester id -> id of their most recent ticket.
    last_by_requester: HashMap<String, String>,
    /// Subscribers keyed by handle; re-adding a handle overwrites.
    subscribers: HashMap<String, Subscriber>,
    /// Highest id issued so far, for strictly increasing time-derived ids.
    last_issued_ms: i64,
}

impl TicketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from persisted snapshots.
    ///
    /// Tickets are assumed to be in creation order (ids are increasing);
    /// the newest ticket per requester becomes their "last ticket".
    pub fn from_snapshots(tickets: Vec<Ticket>, subscribers: Vec<Subscriber>) -> Self {
        let mut registry = Self::new();
        for ticket in tickets {
            registry.last_issued_ms = registry
                .last_issued_ms
                .max(ticket.id.parse::<i64>().unwrap_or(0));
            registry
                .last_by_requester
                .insert(ticket.requester_id.clone(), ticket.id.clone());
            registry.index.insert(ticket.id.clone(), registry.tickets.len());
            registry.tickets.push(ticket);
        }
        for subscriber in subscribers {
            registry
                .subscribers
                .insert(subscriber.handle.clone(), subscriber);
        }
        registry
    }

    /// Creates a ticket in status PENDING and records it as the
    /// requester's last ticket.
    ///
    /// The caller guarantees a non-empty description and a valid category
    /// (the chat flow only submits descriptions while one is pending).
    pub fn create(
        &mut self,
        requester_id: &str,
        requester_name: &str,
        category: TicketCategory,
        description: &str,
    ) -> Ticket {
        let now = Utc::now();
        let id = self.next_id(now);
        let ticket = Ticket {
            id: id.clone(),
            requester_id: requester_id.to_string(),
            requester_name: requester_name.to_string(),
            category,
            description: description.to_string(),
            status: TicketStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.index.insert(id.clone(), self.tickets.len());
        self.tickets.push(ticket.clone());
        self.last_by_requester
            .insert(requester_id.to_string(), id);
        ticket
    }

    /// Transitions a ticket to `new_status`.
    ///
    /// Tickets already COMPLETED or REJECTED are frozen; any other
    /// requested transition is accepted as an admin override, including
    /// PENDING -> COMPLETED and re-entering the current status.
    pub fn transition(
        &mut self,
        id: &str,
        new_status: TicketStatus,
    ) -> Result<Ticket, DeskError> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| DeskError::TicketNotFound { id: id.to_string() })?;
        let ticket = &mut self.tickets[pos];

        if ticket.status.is_terminal() {
            return Err(DeskError::InvalidTransition {
                id: id.to_string(),
                from: ticket.status,
                to: new_status,
            });
        }

        ticket.status = new_status;
        // updated_at never decreases, even against clock skew.
        ticket.updated_at = Utc::now().max(ticket.updated_at);
        Ok(ticket.clone())
    }

    /// All tickets in creation order.
    pub fn list(&self) -> Vec<Ticket> {
        self.tickets.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.index.get(id).map(|&pos| &self.tickets[pos])
    }

    /// The requester's most recent ticket, for repeat submission.
    pub fn last_ticket_for(&self, requester_id: &str) -> Option<&Ticket> {
        self.last_by_requester
            .get(requester_id)
            .and_then(|id| self.get(id))
    }

    /// Adds or replaces a subscriber record; keyed by handle, last write
    /// wins.
    pub fn upsert_subscriber(&mut self, subscriber: Subscriber) {
        self.subscribers
            .insert(subscriber.handle.clone(), subscriber);
    }

    /// Removes a subscriber by record id; returns whether one was removed.
    pub fn remove_subscriber(&mut self, id: &str) -> bool {
        let handle = self
            .subscribers
            .values()
            .find(|s| s.id == id)
            .map(|s| s.handle.clone());
        match handle {
            Some(handle) => self.subscribers.remove(&handle).is_some(),
            None => false,
        }
    }

    /// All subscribers, ordered by handle for deterministic listings.
    pub fn subscribers(&self) -> Vec<Subscriber> {
        let mut all: Vec<Subscriber> = self.subscribers.values().cloned().collect();
        all.sort_by(|a, b| a.handle.cmp(&b.handle));
        all
    }

    /// Whether the handle belongs to an admin subscriber.
    pub fn is_admin_subscriber(&self, handle: &str) -> bool {
        self.subscribers
            .values()
            .any(|s| s.is_admin && s.handle.eq_ignore_ascii_case(handle))
    }

    /// Allocates a time-derived id, bumped past the previous one when two
    /// tickets land in the same millisecond.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let ms = now.timestamp_millis().max(self.last_issued_ms + 1);
        self.last_issued_ms = ms;
        ms.to_string()
    }
}
