// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-type filtering and identity extraction.
//!
//! Maps Telegram senders onto the channel-agnostic [`ChatIdentity`] the
//! desk service works with: user id, optional `@`-less username, display
//! name, and the chat address replies go back to.

use teloxide::prelude::*;
use teloxide::types::ChatKind;

use deskbot_core::ChatIdentity;

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Extracts the sender identity from a message.
///
/// Returns `None` for messages without a sender (e.g. channel posts).
pub fn identity_of(msg: &Message) -> Option<ChatIdentity> {
    let user = msg.from.as_ref()?;
    Some(ChatIdentity {
        user_id: user.id.0.to_string(),
        handle: user.username.clone(),
        display_name: Some(user.full_name()),
        address: msg.chat.id.0.to_string(),
    })
}

/// Extracts the sender identity from a callback query.
///
/// Callback queries always carry a sender; the reply address falls back
/// to the sender's own chat when the originating message is gone.
pub fn identity_of_query(query: &CallbackQuery) -> ChatIdentity {
    let user = &query.from;
    let user_id = user.id.0.to_string();
    let address = query
        .message
        .as_ref()
        .map(|m| m.chat().id.0.to_string())
        .unwrap_or_else(|| user_id.clone());
    ChatIdentity {
        user_id,
        handle: user.username.clone(),
        display_name: Some(user.full_name()),
        address,
    }
}
