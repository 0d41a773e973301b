// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging channel trait for chat platform integrations.

use async_trait::async_trait;

use crate::error::DeskError;
use crate::types::ActionSet;

/// Outbound seam to a chat messaging platform.
///
/// The desk core never embeds channel-specific mechanics; adapters
/// (Telegram, mocks) translate addresses and action sets into their
/// platform's wire format.
#[async_trait]
pub trait MessagingChannel: Send + Sync {
    /// Adapter name for logging.
    fn name(&self) -> &str;

    /// Delivers one message to one address, optionally with interactive
    /// controls attached.
    ///
    /// A failed send affects only this recipient; callers doing fan-out
    /// catch and log per-recipient errors rather than propagating them.
    async fn send_message(
        &self,
        address: &str,
        text: &str,
        actions: Option<ActionSet>,
    ) -> Result<(), DeskError>;
}
