// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live broadcast hub for dashboard observers.
//!
//! Each observer is an mpsc sender feeding one WebSocket connection. Events
//! are serialized once and pushed to every observer; there is no replay
//! buffer and no acknowledgment. Observers whose queue is gone are pruned
//! opportunistically on the next broadcast.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use deskbot_core::DeskEvent;

/// Fan-out point for dashboard events.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    observers: DashMap<String, mpsc::Sender<String>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer's outbound queue under its connection id.
    pub fn attach(&self, observer_id: &str, tx: mpsc::Sender<String>) {
        self.observers.insert(observer_id.to_string(), tx);
        debug!(observer_id, count = self.observers.len(), "observer attached");
    }

    /// Removes an observer (normal disconnect path).
    pub fn detach(&self, observer_id: &str) {
        self.observers.remove(observer_id);
        debug!(observer_id, count = self.observers.len(), "observer detached");
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Pushes one event to every connected observer.
    ///
    /// Send errors never propagate: a closed queue prunes the observer, a
    /// full queue drops the event for that observer only.
    pub fn broadcast(&self, event: &DeskEvent) {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "failed to encode broadcast event");
                return;
            }
        };

        let mut dead: Vec<String> = Vec::new();
        for entry in self.observers.iter() {
            match entry.value().try_send(json.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    dead.push(entry.key().clone());
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(observer_id = %entry.key(), "observer queue full, dropping event");
                }
            }
        }

        for observer_id in dead {
            self.observers.remove(&observer_id);
            debug!(%observer_id, "pruned disconnected observer");
        }
    }
}
