// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin notification fan-out.
//!
//! The recipient set is the primary admin's address (once bound) plus all
//! admin subscribers. Delivery is fire-and-forget per recipient: sends are
//! gathered concurrently, each failure is caught and logged, and none of
//! them ever fails the triggering operation. The mutation is already
//! committed before fan-out starts.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use futures::future::join_all;
use tracing::{debug, info, warn};

use deskbot_core::{ActionSet, ChatIdentity, MessagingChannel, Subscriber};

/// Computes the admin recipient set and dispatches to each.
pub struct AdminNotifier {
    channel: Arc<dyn MessagingChannel>,
    /// Handle of the single primary administrator, from configuration.
    admin_handle: Option<String>,
    /// The primary admin's channel address, bound just-in-time on their
    /// first session-start signal. Until then that recipient is silently
    /// dropped from every fan-out.
    primary_address: ArcSwapOption<String>,
}

impl AdminNotifier {
    pub fn new(channel: Arc<dyn MessagingChannel>, admin_handle: Option<String>) -> Self {
        Self {
            channel,
            admin_handle,
            primary_address: ArcSwapOption::empty(),
        }
    }

    /// Whether the identity carries the configured primary-admin handle.
    pub fn is_primary_admin(&self, identity: &ChatIdentity) -> bool {
        self.admin_handle
            .as_deref()
            .is_some_and(|handle| identity.has_handle(handle))
    }

    /// Binds the primary admin's address if this identity is the primary
    /// admin and no address is bound yet. First signal wins; the binding
    /// holds for the process lifetime. Returns whether a binding happened.
    pub fn bind_primary(&self, identity: &ChatIdentity) -> bool {
        if !self.is_primary_admin(identity) || self.primary_address.load().is_some() {
            return false;
        }
        self.primary_address
            .store(Some(Arc::new(identity.address.clone())));
        info!(address = %identity.address, "primary admin address bound");
        true
    }

    pub fn primary_address(&self) -> Option<String> {
        self.primary_address.load().as_deref().cloned()
    }

    /// Delivers one message to every admin recipient, tolerating
    /// individual failures.
    ///
    /// `subscribers` is the full subscriber list at call time; non-admins
    /// are filtered here. Addresses are deduplicated so the primary admin
    /// is not messaged twice when also subscribed.
    pub async fn notify_admins(
        &self,
        subscribers: &[Subscriber],
        text: &str,
        actions: Option<ActionSet>,
    ) {
        let mut recipients: Vec<String> = Vec::new();
        if let Some(address) = self.primary_address() {
            recipients.push(address);
        }
        for subscriber in subscribers.iter().filter(|s| s.is_admin) {
            if !recipients.contains(&subscriber.channel_address) {
                recipients.push(subscriber.channel_address.clone());
            }
        }

        if recipients.is_empty() {
            debug!("no admin recipients bound yet, dropping notification");
            return;
        }

        let sends = recipients.iter().map(|address| {
            let actions = actions.clone();
            async move {
                (
                    address,
                    self.channel.send_message(address, text, actions).await,
                )
            }
        });

        for (address, result) in join_all(sends).await {
            if let Err(error) = result {
                warn!(%address, %error, "failed to notify admin, skipping recipient");
            }
        }
    }
}
