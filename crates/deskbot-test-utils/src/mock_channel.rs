// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging channel for deterministic testing.
//!
//! `MockChannel` implements `MessagingChannel`, capturing every outbound
//! message for assertion. Individual addresses can be marked as failing
//! to exercise partial fan-out delivery.

use async_trait::async_trait;
use tokio::sync::Mutex;

use deskbot_core::{ActionSet, DeskError, MessagingChannel};

/// A single captured outbound message.
#[derive(Debug, Clone)]
pub struct SentMessage {
    /// Recipient chat address.
    pub address: String,
    /// Message text.
    pub text: String,
    /// Keyboard or inline actions attached to the message, if any.
    pub actions: Option<ActionSet>,
}

/// A mock messaging channel for testing.
pub struct MockChannel {
    sent: Mutex<Vec<SentMessage>>,
    failing: Mutex<Vec<String>>,
}

impl MockChannel {
    /// Create a new mock channel that delivers everywhere.
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
        }
    }

    /// Mark an address as failing: sends to it will return a channel error.
    pub async fn fail_address(&self, address: &str) {
        self.failing.lock().await.push(address.to_string());
    }

    /// Get all messages that were delivered through `send_message()`.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Get all delivered messages addressed to `address`.
    pub async fn sent_to(&self, address: &str) -> Vec<SentMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.address == address)
            .cloned()
            .collect()
    }

    /// Get the count of delivered messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all captured messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagingChannel for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    async fn send_message(
        &self,
        address: &str,
        text: &str,
        actions: Option<ActionSet>,
    ) -> Result<(), DeskError> {
        if self.failing.lock().await.iter().any(|a| a == address) {
            return Err(DeskError::Channel {
                message: format!("mock delivery failure for {address}"),
                source: None,
            });
        }
        self.sent.lock().await.push(SentMessage {
            address: address.to_string(),
            text: text.to_string(),
            actions,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_captures_outbound_messages() {
        let channel = MockChannel::new();
        channel
            .send_message("42", "hello", None)
            .await
            .unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].address, "42");
        assert_eq!(sent[0].text, "hello");
        assert!(sent[0].actions.is_none());
    }

    #[tokio::test]
    async fn failing_address_errors_without_capture() {
        let channel = MockChannel::new();
        channel.fail_address("13").await;

        let err = channel.send_message("13", "hello", None).await.unwrap_err();
        assert!(matches!(err, DeskError::Channel { .. }));
        assert_eq!(channel.sent_count().await, 0);

        // Other addresses still deliver.
        channel.send_message("42", "hello", None).await.unwrap();
        assert_eq!(channel.sent_count().await, 1);
    }

    #[tokio::test]
    async fn sent_to_filters_by_address() {
        let channel = MockChannel::new();
        channel.send_message("1", "a", None).await.unwrap();
        channel.send_message("2", "b", None).await.unwrap();
        channel.send_message("1", "c", None).await.unwrap();

        let to_one = channel.sent_to("1").await;
        assert_eq!(to_one.len(), 2);
        assert_eq!(to_one[1].text, "c");
    }

    #[tokio::test]
    async fn sent_count_and_clear() {
        let channel = MockChannel::new();
        assert_eq!(channel.sent_count().await, 0);

        channel.send_message("1", "a", None).await.unwrap();
        channel.send_message("1", "b", None).await.unwrap();
        assert_eq!(channel.sent_count().await, 2);

        channel.clear_sent().await;
        assert_eq!(channel.sent_count().await, 0);
    }
}
