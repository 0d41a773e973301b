// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a started desk service over a temp snapshot
//! directory with a [`MockChannel`], and provides helpers to drive the
//! chat dialogue the way the Telegram adapter would.

use std::sync::Arc;

use deskbot_core::{ChatIdentity, DeskError, TicketCategory};
use deskbot_desk::DeskService;
use deskbot_storage::SnapshotStore;

use crate::mock_channel::MockChannel;

/// A complete desk stack under test.
pub struct TestHarness {
    /// The service under test, already started.
    pub service: Arc<DeskService>,
    /// The mock chat channel all sends go through.
    pub channel: Arc<MockChannel>,
    temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Builds and starts a harness with the given configured admin handle.
    pub async fn start(admin_handle: Option<&str>) -> Result<Self, DeskError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| DeskError::Persistence {
            message: "failed to create temp snapshot directory".into(),
            source: Some(Box::new(e)),
        })?;
        let store = SnapshotStore::open(temp_dir.path())?;
        let channel = Arc::new(MockChannel::new());
        let service = Arc::new(DeskService::new(
            store,
            channel.clone(),
            admin_handle.map(str::to_string),
        ));
        service.start().await;
        channel.clear_sent().await;
        Ok(Self {
            service,
            channel,
            temp_dir,
        })
    }

    /// Path of the snapshot directory, for restart-and-reload tests.
    pub fn data_dir(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// A private-chat identity whose address equals the user id, as on
    /// Telegram DMs.
    pub fn identity(user_id: &str, handle: Option<&str>) -> ChatIdentity {
        ChatIdentity {
            user_id: user_id.to_string(),
            handle: handle.map(str::to_string),
            display_name: Some("Test User".to_string()),
            address: user_id.to_string(),
        }
    }

    /// Drives the full chat dialogue for one ticket: category button press
    /// followed by the description message.
    pub async fn file_ticket(
        &self,
        identity: &ChatIdentity,
        category: TicketCategory,
        description: &str,
    ) {
        self.service
            .text_received(identity, category.label())
            .await;
        self.service.text_received(identity, description).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskbot_core::TicketStatus;

    #[tokio::test]
    async fn harness_files_tickets_end_to_end() {
        let harness = TestHarness::start(Some("admin")).await.unwrap();
        let alice = TestHarness::identity("42", Some("alice"));

        harness
            .file_ticket(&alice, TicketCategory::Repair, "screen cracked")
            .await;

        let tickets = harness.service.list_tickets().await;
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].status, TicketStatus::Pending);
        assert_eq!(tickets[0].description, "screen cracked");
    }
}
