// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-collection snapshot store.
//!
//! Writes are synchronous local file rewrites of the full collection; the
//! in-memory registry stays the source of truth, so a failed write is
//! reported but never fatal.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use deskbot_core::{DeskError, Subscriber, Ticket};

const TICKETS_FILE: &str = "tickets.json";
const SUBSCRIBERS_FILE: &str = "subscribers.json";

/// Durable store for the ticket and subscriber collections.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    /// Opens a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, DeskError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| DeskError::Persistence {
            message: format!("failed to create data dir {}", data_dir.display()),
            source: Some(Box::new(e)),
        })?;
        Ok(Self { data_dir })
    }

    /// Loads the ticket snapshot. Fail-open: missing, unreadable, or
    /// corrupt files yield an empty collection.
    pub fn load_tickets(&self) -> Vec<Ticket> {
        load_collection(&self.data_dir.join(TICKETS_FILE))
    }

    /// Loads the subscriber snapshot, fail-open like tickets.
    pub fn load_subscribers(&self) -> Vec<Subscriber> {
        load_collection(&self.data_dir.join(SUBSCRIBERS_FILE))
    }

    /// Rewrites the full ticket snapshot.
    pub fn save_tickets(&self, tickets: &[Ticket]) -> Result<(), DeskError> {
        save_collection(&self.data_dir.join(TICKETS_FILE), tickets)
    }

    /// Rewrites the full subscriber snapshot.
    pub fn save_subscribers(&self, subscribers: &[Subscriber]) -> Result<(), DeskError> {
        save_collection(&self.data_dir.join(SUBSCRIBERS_FILE), subscribers)
    }
}

fn load_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no snapshot yet, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "snapshot unreadable, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(items) => items,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "snapshot corrupt, starting empty");
            Vec::new()
        }
    }
}

fn save_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<(), DeskError> {
    let json = serde_json::to_vec_pretty(items).map_err(|e| DeskError::Persistence {
        message: format!("failed to encode snapshot {}", path.display()),
        source: Some(Box::new(e)),
    })?;
    fs::write(path, json).map_err(|e| DeskError::Persistence {
        message: format!("failed to write snapshot {}", path.display()),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use deskbot_core::{TicketCategory, TicketStatus};

    fn sample_ticket(id: &str) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: id.into(),
            requester_id: "42".into(),
            requester_name: "alice".into(),
            category: TicketCategory::Repair,
            description: "laptop won't boot".into(),
            status: TicketStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn round_trip_preserves_tickets() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        let tickets = vec![sample_ticket("1"), sample_ticket("2")];
        store.save_tickets(&tickets).unwrap();

        let reloaded = store.load_tickets();
        assert_eq!(reloaded, tickets);
    }

    #[test]
    fn round_trip_preserves_subscribers() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        let subscribers = vec![Subscriber {
            id: "s1".into(),
            handle: "oncall".into(),
            channel_address: "1001".into(),
            is_admin: true,
        }];
        store.save_subscribers(&subscribers).unwrap();

        assert_eq!(store.load_subscribers(), subscribers);
    }

    #[test]
    fn missing_snapshot_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        assert!(store.load_tickets().is_empty());
        assert!(store.load_subscribers().is_empty());
    }

    #[test]
    fn corrupt_snapshot_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("tickets.json"), b"{not json").unwrap();
        assert!(store.load_tickets().is_empty());
    }

    #[test]
    fn open_creates_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let store = SnapshotStore::open(&nested).unwrap();
        store.save_tickets(&[]).unwrap();
        assert!(nested.join("tickets.json").exists());
    }
}
