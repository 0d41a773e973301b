// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation from channel-agnostic action sets to Telegram reply markup.
//!
//! Reply buttons become a resized one-shot keyboard; inline actions become
//! callback buttons whose data is the action id.

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};

use deskbot_core::ActionSet;

/// Converts an [`ActionSet`] into the corresponding Telegram markup.
pub fn reply_markup(actions: ActionSet) -> ReplyMarkup {
    match actions {
        ActionSet::Buttons(rows) => {
            let rows = rows
                .into_iter()
                .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>());
            ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard())
        }
        ActionSet::Actions(rows) => {
            let rows = rows.into_iter().map(|row| {
                row.into_iter()
                    .map(|action| InlineKeyboardButton::callback(action.label, action.action_id))
                    .collect::<Vec<_>>()
            });
            ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows))
        }
    }
}
