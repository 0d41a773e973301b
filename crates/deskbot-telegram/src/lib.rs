// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram chat adapter for the Deskbot helpdesk bridge.
//!
//! Implements [`MessagingChannel`] over the Telegram Bot API via teloxide
//! and runs the long-polling dispatcher that feeds chat events into the
//! desk service.

pub mod handler;
pub mod keyboard;

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::{debug, info, warn};

use deskbot_config::model::TelegramConfig;
use deskbot_core::{ActionSet, DeskError, MessagingChannel};
use deskbot_desk::DeskService;

/// Telegram messaging channel implementing [`MessagingChannel`].
///
/// Addresses are Telegram chat ids rendered as decimal strings; for the
/// private chats this bot works in, a user's chat id equals their user id.
pub struct TelegramChannel {
    bot: Bot,
}

impl TelegramChannel {
    /// Creates the channel. Requires `config.bot_token` to be set and
    /// non-empty.
    pub fn new(config: &TelegramConfig) -> Result<Self, DeskError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            DeskError::Config("telegram.bot_token is required for the Telegram channel".into())
        })?;
        if token.is_empty() {
            return Err(DeskError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }
        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl MessagingChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_message(
        &self,
        address: &str,
        text: &str,
        actions: Option<ActionSet>,
    ) -> Result<(), DeskError> {
        let chat_id = address
            .parse::<i64>()
            .map(ChatId)
            .map_err(|e| DeskError::Channel {
                message: format!("invalid chat address {address:?}: {e}"),
                source: None,
            })?;

        let request = self.bot.send_message(Recipient::Id(chat_id), text);
        let request = match actions {
            Some(actions) => request.reply_markup(keyboard::reply_markup(actions)),
            None => request,
        };
        request.await.map_err(|e| DeskError::Channel {
            message: format!("failed to send message to {address}: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(())
    }
}

/// Runs Telegram long polling, routing chat events into the desk service
/// until the dispatcher is shut down.
///
/// Only private chats are processed; group and channel traffic is ignored.
/// `/start` opens a session, other text feeds the ticket dialogue, and
/// inline button presses arrive as callback queries carrying action ids.
pub async fn run_polling(bot: Bot, service: Arc<DeskService>) {
    info!("starting Telegram long polling");

    let message_branch = Update::filter_message().endpoint(
        |msg: Message, service: Arc<DeskService>| async move {
            if !handler::is_dm(&msg) {
                debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                return respond(());
            }
            let Some(identity) = handler::identity_of(&msg) else {
                debug!(chat_id = msg.chat.id.0, "ignoring message without a sender");
                return respond(());
            };
            if let Some(text) = msg.text() {
                if text.trim() == "/start" {
                    service.session_started(&identity).await;
                } else {
                    service.text_received(&identity, text).await;
                }
            } else {
                debug!(msg_id = msg.id.0, "ignoring non-text message");
            }
            respond(())
        },
    );

    let callback_branch = Update::filter_callback_query().endpoint(
        |bot: Bot, query: CallbackQuery, service: Arc<DeskService>| async move {
            let identity = handler::identity_of_query(&query);
            match query.data.as_deref() {
                Some(action_id) => service.action_received(&identity, action_id).await,
                None => debug!("ignoring callback query without data"),
            }
            // Clear the client-side loading spinner.
            if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                warn!(error = %e, "failed to answer callback query");
            }
            respond(())
        },
    );

    Dispatcher::builder(
        bot,
        dptree::entry().branch(message_branch).branch(callback_branch),
    )
    .dependencies(dptree::deps![service])
    .default_handler(|_| async {}) // Silently ignore other update kinds
    .build()
    .dispatch()
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_bot_token() {
        let config = TelegramConfig {
            bot_token: None,
            admin_handle: Some("admin".into()),
        };
        assert!(TelegramChannel::new(&config).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        let config = TelegramConfig {
            bot_token: Some(String::new()),
            admin_handle: Some("admin".into()),
        };
        assert!(TelegramChannel::new(&config).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
            admin_handle: Some("admin".into()),
        };
        let channel = TelegramChannel::new(&config).unwrap();
        assert_eq!(channel.name(), "telegram");
    }

    #[tokio::test]
    async fn send_rejects_non_numeric_address() {
        let config = TelegramConfig {
            bot_token: Some("test:token".into()),
            admin_handle: None,
        };
        let channel = TelegramChannel::new(&config).unwrap();
        let err = channel
            .send_message("not-a-chat-id", "hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Channel { .. }));
    }
}
