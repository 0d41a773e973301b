// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The desk service: sequences every mutation through the registry, the
//! snapshot store, the broadcast hub, and the chat channel.
//!
//! Ordering contract per mutation: registry change, snapshot write, and
//! dashboard broadcast all happen under the single state lock (so observer
//! snapshots never lose or duplicate events), then the lock is released
//! and chat notifications fan out. Durability strictly precedes fan-out; a
//! failed snapshot write is logged and the in-memory state remains the
//! source of truth.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use deskbot_core::{
    BotState, ChatIdentity, DeskError, DeskEvent, MessagingChannel, Subscriber, Ticket,
    TicketCategory, TicketStatus,
};
use deskbot_storage::SnapshotStore;

use crate::broadcast::BroadcastHub;
use crate::notify::AdminNotifier;
use crate::registry::TicketRegistry;
use crate::session::SessionTracker;
use crate::text;

/// Admin triage actions carried in inline action ids.
enum TriageAction {
    Accept,
    Reject,
}

impl TriageAction {
    /// Parses an action id of the form `accept:<ticket-id>`.
    fn parse(action_id: &str) -> Option<(TriageAction, &str)> {
        let (verb, ticket_id) = action_id.split_once(':')?;
        match verb {
            "accept" => Some((TriageAction::Accept, ticket_id)),
            "reject" => Some((TriageAction::Reject, ticket_id)),
            _ => None,
        }
    }

    fn target_status(&self) -> TicketStatus {
        match self {
            TriageAction::Accept => TicketStatus::InProgress,
            TriageAction::Reject => TicketStatus::Rejected,
        }
    }
}

/// Mutable state guarded by the single service lock.
struct DeskState {
    registry: TicketRegistry,
    sessions: SessionTracker,
}

/// Central coordinator between chat users, administrators, and dashboard
/// observers.
pub struct DeskService {
    state: Mutex<DeskState>,
    store: SnapshotStore,
    channel: Arc<dyn MessagingChannel>,
    notifier: AdminNotifier,
    hub: BroadcastHub,
    running: AtomicBool,
}

impl DeskService {
    /// Builds a service over a snapshot store and a messaging channel.
    /// Persisted collections are loaded immediately; the bot starts in the
    /// stopped state until [`DeskService::start`] is called.
    pub fn new(
        store: SnapshotStore,
        channel: Arc<dyn MessagingChannel>,
        admin_handle: Option<String>,
    ) -> Self {
        let registry =
            TicketRegistry::from_snapshots(store.load_tickets(), store.load_subscribers());
        Self {
            state: Mutex::new(DeskState {
                registry,
                sessions: SessionTracker::new(),
            }),
            store,
            notifier: AdminNotifier::new(channel.clone(), admin_handle),
            channel,
            hub: BroadcastHub::new(),
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts the bot side of the bridge. Idempotent: returns `false`
    /// without side effects when already running. On an actual start the
    /// snapshots are re-read and admins are told the desk is online.
    pub async fn start(&self) -> bool {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let subscribers = {
            let mut state = self.state.lock().await;
            state.registry = TicketRegistry::from_snapshots(
                self.store.load_tickets(),
                self.store.load_subscribers(),
            );
            state.registry.subscribers()
        };
        info!("desk started");
        self.notifier
            .notify_admins(&subscribers, text::BOT_ONLINE, None)
            .await;
        true
    }

    /// Stops the bot side. Idempotent like [`DeskService::start`]. State
    /// is persisted and admins are told the desk is offline.
    pub async fn stop(&self) -> bool {
        if self
            .running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let subscribers = {
            let state = self.state.lock().await;
            self.persist_tickets(&state.registry);
            self.persist_subscribers(&state.registry);
            state.registry.subscribers()
        };
        info!("desk stopped");
        self.notifier
            .notify_admins(&subscribers, text::BOT_OFFLINE, None)
            .await;
        true
    }

    // ---- chat events (Messaging Channel contract) ----

    /// A user sent the session-start signal (`/start`).
    pub async fn session_started(&self, identity: &ChatIdentity) {
        if !self.is_running() {
            debug!("desk stopped, ignoring session start");
            return;
        }

        if self.notifier.bind_primary(identity) {
            self.send_to(&identity.address, text::ADMIN_AUTHORIZED, None)
                .await;
        }

        let has_last = {
            let mut state = self.state.lock().await;
            state.sessions.clear(&identity.user_id);
            state.registry.last_ticket_for(&identity.user_id).is_some()
        };
        self.send_to(
            &identity.address,
            text::WELCOME,
            Some(text::main_keyboard(has_last)),
        )
        .await;
    }

    /// A user sent a plain text message.
    pub async fn text_received(&self, identity: &ChatIdentity, message: &str) {
        if !self.is_running() {
            debug!("desk stopped, ignoring message");
            return;
        }
        let message = message.trim();
        if message.is_empty() || message.starts_with('/') {
            return;
        }

        if message == text::REPEAT_LABEL {
            self.repeat_last(identity).await;
            return;
        }

        if let Some(category) = TicketCategory::from_label(message) {
            {
                let mut state = self.state.lock().await;
                state.sessions.category_chosen(&identity.user_id, category);
            }
            self.send_to(&identity.address, text::PROMPT_DESCRIPTION, None)
                .await;
            return;
        }

        let pending = {
            let mut state = self.state.lock().await;
            state.sessions.take_description(&identity.user_id, message)
        };
        match pending {
            Some((category, description)) => {
                self.submit_ticket(identity, category, &description, false)
                    .await;
            }
            None => {
                debug!(user_id = %identity.user_id, "message outside ticket dialogue, ignoring");
            }
        }
    }

    /// An admin pressed an inline action (accept/reject) on a ticket
    /// notification.
    pub async fn action_received(&self, identity: &ChatIdentity, action_id: &str) {
        if !self.is_running() {
            debug!("desk stopped, ignoring action");
            return;
        }
        let Some((action, ticket_id)) = TriageAction::parse(action_id) else {
            debug!(action_id, "unrecognized action id, ignoring");
            return;
        };

        if !self.is_admin(identity).await {
            let refusal = DeskError::Unauthorized {
                actor: identity.user_id.clone(),
            };
            warn!(ticket_id, %refusal, "refusing triage action");
            self.send_to(&identity.address, text::UNAUTHORIZED, None)
                .await;
            return;
        }

        match self.apply_transition(ticket_id, action.target_status()).await {
            Ok((ticket, subscribers)) => {
                self.send_to(
                    &ticket.requester_id,
                    &text::status_update_for_requester(&ticket),
                    None,
                )
                .await;
                self.notifier
                    .notify_admins(&subscribers, &text::status_change_summary(&ticket), None)
                    .await;
            }
            Err(error) => {
                warn!(ticket_id, %error, "triage action failed");
                self.send_to(&identity.address, &error.to_string(), None)
                    .await;
            }
        }
    }

    // ---- dashboard observers ----

    /// Registers a dashboard observer and seeds it with the full current
    /// state. The snapshot and the registration happen under the state
    /// lock, so the INIT event exactly matches the ticket list at connect
    /// time and no later event is missed or duplicated.
    pub async fn attach_observer(&self, observer_id: &str, tx: mpsc::Sender<String>) {
        let state = self.state.lock().await;
        let init = DeskEvent::Init {
            tickets: state.registry.list(),
            bot_state: BotState {
                is_running: self.is_running(),
            },
        };
        match serde_json::to_string(&init) {
            Ok(json) => {
                if tx.try_send(json).is_err() {
                    warn!(observer_id, "observer gone before INIT, not attaching");
                    return;
                }
                self.hub.attach(observer_id, tx);
            }
            Err(error) => warn!(%error, "failed to encode INIT snapshot"),
        }
    }

    pub fn detach_observer(&self, observer_id: &str) {
        self.hub.detach(observer_id);
    }

    /// A dashboard observer requested a status change. Routes into the
    /// registry exactly like an admin action; the gateway is treated as an
    /// operator console, so no further identity check applies here.
    pub async fn update_status_from_observer(
        &self,
        ticket_id: &str,
        status: TicketStatus,
    ) -> Result<Ticket, DeskError> {
        let (ticket, _) = self.apply_transition(ticket_id, status).await?;
        if self.is_running() {
            self.send_to(
                &ticket.requester_id,
                &text::status_update_for_requester(&ticket),
                None,
            )
            .await;
        }
        Ok(ticket)
    }

    // ---- registry queries and subscriber management ----

    pub async fn list_tickets(&self) -> Vec<Ticket> {
        self.state.lock().await.registry.list()
    }

    pub async fn list_subscribers(&self) -> Vec<Subscriber> {
        self.state.lock().await.registry.subscribers()
    }

    /// Adds (or overwrites, by handle) a notification subscriber.
    pub async fn add_subscriber(
        &self,
        handle: &str,
        channel_address: &str,
        is_admin: bool,
    ) -> Subscriber {
        let subscriber = Subscriber {
            id: uuid::Uuid::new_v4().to_string(),
            handle: handle.to_string(),
            channel_address: channel_address.to_string(),
            is_admin,
        };
        let mut state = self.state.lock().await;
        state.registry.upsert_subscriber(subscriber.clone());
        self.persist_subscribers(&state.registry);
        subscriber
    }

    /// Removes a subscriber by record id; returns whether one existed.
    pub async fn remove_subscriber(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        let removed = state.registry.remove_subscriber(id);
        if removed {
            self.persist_subscribers(&state.registry);
        }
        removed
    }

    // ---- internals ----

    async fn is_admin(&self, identity: &ChatIdentity) -> bool {
        if self.notifier.is_primary_admin(identity) {
            return true;
        }
        match identity.handle.as_deref() {
            Some(handle) => self.state.lock().await.registry.is_admin_subscriber(handle),
            None => false,
        }
    }

    /// Resubmits the requester's last ticket as a brand-new PENDING one.
    async fn repeat_last(&self, identity: &ChatIdentity) {
        let last = {
            let state = self.state.lock().await;
            state
                .registry
                .last_ticket_for(&identity.user_id)
                .map(|t| (t.category, t.description.clone()))
        };
        match last {
            Some((category, description)) => {
                self.submit_ticket(identity, category, &description, true)
                    .await;
            }
            None => {
                debug!(user_id = %identity.user_id, "repeat requested without a previous ticket");
            }
        }
    }

    async fn submit_ticket(
        &self,
        identity: &ChatIdentity,
        category: TicketCategory,
        description: &str,
        repeated: bool,
    ) {
        let (ticket, subscribers) = {
            let mut state = self.state.lock().await;
            let ticket = state.registry.create(
                &identity.user_id,
                &identity.requester_name(),
                category,
                description,
            );
            self.persist_tickets(&state.registry);
            self.hub.broadcast(&DeskEvent::NewRequest {
                ticket: ticket.clone(),
            });
            (ticket, state.registry.subscribers())
        };
        info!(ticket_id = %ticket.id, %category, repeated, "ticket created");

        self.notifier
            .notify_admins(
                &subscribers,
                &text::new_ticket_summary(&ticket, repeated),
                Some(text::triage_actions(&ticket.id)),
            )
            .await;
        self.send_to(
            &identity.address,
            text::TICKET_CONFIRMED,
            Some(text::main_keyboard(true)),
        )
        .await;
    }

    /// Transitions a ticket and commits registry, snapshot, and broadcast
    /// under the lock. Returns the updated ticket plus the subscriber set
    /// for the caller's chat fan-out.
    async fn apply_transition(
        &self,
        ticket_id: &str,
        status: TicketStatus,
    ) -> Result<(Ticket, Vec<Subscriber>), DeskError> {
        let mut state = self.state.lock().await;
        let ticket = state.registry.transition(ticket_id, status)?;
        self.persist_tickets(&state.registry);
        self.hub.broadcast(&DeskEvent::UpdateRequest {
            ticket: ticket.clone(),
        });
        info!(%ticket_id, %status, "ticket transitioned");
        Ok((ticket, state.registry.subscribers()))
    }

    fn persist_tickets(&self, registry: &TicketRegistry) {
        if let Err(error) = self.store.save_tickets(&registry.list()) {
            warn!(%error, "ticket snapshot write failed, keeping in-memory state");
        }
    }

    fn persist_subscribers(&self, registry: &TicketRegistry) {
        if let Err(error) = self.store.save_subscribers(&registry.subscribers()) {
            warn!(%error, "subscriber snapshot write failed, keeping in-memory state");
        }
    }

    /// Best-effort single send; failures are logged, never propagated.
    async fn send_to(&self, address: &str, message: &str, actions: Option<deskbot_core::ActionSet>) {
        if let Err(error) = self.channel.send_message(address, message, actions).await {
            warn!(%address, %error, "chat send failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use deskbot_core::ActionSet;

    #[derive(Debug, Clone)]
    struct SentMessage {
        address: String,
        text: String,
        actions: Option<ActionSet>,
    }

    /// Captures sends; addresses listed in `failing` error out.
    struct RecordingChannel {
        sent: Mutex<Vec<SentMessage>>,
        failing: Vec<String>,
    }

    impl RecordingChannel {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                failing: Vec::new(),
            }
        }

        async fn sent(&self) -> Vec<SentMessage> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl MessagingChannel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send_message(
            &self,
            address: &str,
            message: &str,
            actions: Option<ActionSet>,
        ) -> Result<(), DeskError> {
            if self.failing.iter().any(|a| a == address) {
                return Err(DeskError::Channel {
                    message: format!("simulated failure for {address}"),
                    source: None,
                });
            }
            self.sent.lock().await.push(SentMessage {
                address: address.to_string(),
                text: message.to_string(),
                actions,
            });
            Ok(())
        }
    }

    fn identity(user_id: &str, handle: Option<&str>) -> ChatIdentity {
        ChatIdentity {
            user_id: user_id.into(),
            handle: handle.map(str::to_string),
            display_name: Some("Test User".into()),
            address: user_id.into(),
        }
    }

    async fn started_service() -> (Arc<DeskService>, Arc<RecordingChannel>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let channel = Arc::new(RecordingChannel::new());
        let service = Arc::new(DeskService::new(
            store,
            channel.clone(),
            Some("helpdesk_admin".into()),
        ));
        service.start().await;
        channel.sent.lock().await.clear();
        (service, channel, dir)
    }

    #[tokio::test]
    async fn full_creation_dialogue_produces_one_pending_ticket() {
        let (service, channel, _dir) = started_service().await;
        let alice = identity("42", Some("alice"));

        service.session_started(&alice).await;
        service.text_received(&alice, "Repair").await;
        service.text_received(&alice, "laptop won't boot").await;

        let tickets = service.list_tickets().await;
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].category, TicketCategory::Repair);
        assert_eq!(tickets[0].status, TicketStatus::Pending);
        assert_eq!(tickets[0].description, "laptop won't boot");
        assert_eq!(tickets[0].requester_name, "alice");

        // Requester got the welcome, the prompt, and the confirmation.
        let sent = channel.sent().await;
        let texts: Vec<&str> = sent.iter().map(|m| m.text.as_str()).collect();
        assert!(texts.contains(&text::WELCOME));
        assert!(texts.contains(&text::PROMPT_DESCRIPTION));
        assert!(texts.contains(&text::TICKET_CONFIRMED));
    }

    #[tokio::test]
    async fn free_text_while_idle_creates_nothing() {
        let (service, _channel, _dir) = started_service().await;
        let alice = identity("42", Some("alice"));

        service.text_received(&alice, "hello, anyone there?").await;
        assert!(service.list_tickets().await.is_empty());
    }

    #[tokio::test]
    async fn admin_notification_fans_out_on_creation() {
        let (service, channel, _dir) = started_service().await;

        // Primary admin signs in; their address becomes bound.
        let admin = identity("1001", Some("helpdesk_admin"));
        service.session_started(&admin).await;
        service.add_subscriber("oncall", "2002", true).await;
        service.add_subscriber("watcher", "3003", false).await;
        channel.sent.lock().await.clear();

        let alice = identity("42", Some("alice"));
        service.text_received(&alice, "Repair").await;
        service.text_received(&alice, "laptop won't boot").await;

        let sent = channel.sent().await;
        let admin_messages: Vec<&SentMessage> = sent
            .iter()
            .filter(|m| m.text.contains("New request"))
            .collect();
        let addresses: Vec<&str> =
            admin_messages.iter().map(|m| m.address.as_str()).collect();
        assert_eq!(addresses, vec!["1001", "2002"]);
        // Inline triage actions ride along.
        assert!(admin_messages
            .iter()
            .all(|m| matches!(m.actions, Some(ActionSet::Actions(_)))));
    }

    #[tokio::test]
    async fn admin_accept_notifies_requester_and_updates_status() {
        let (service, channel, _dir) = started_service().await;
        let admin = identity("1001", Some("helpdesk_admin"));
        service.session_started(&admin).await;

        let alice = identity("42", Some("alice"));
        service.text_received(&alice, "Repair").await;
        service.text_received(&alice, "laptop won't boot").await;
        let ticket_id = service.list_tickets().await[0].id.clone();
        channel.sent.lock().await.clear();

        service
            .action_received(&admin, &format!("accept:{ticket_id}"))
            .await;

        let tickets = service.list_tickets().await;
        assert_eq!(tickets[0].status, TicketStatus::InProgress);
        assert!(tickets[0].updated_at >= tickets[0].created_at);

        let sent = channel.sent().await;
        assert!(sent
            .iter()
            .any(|m| m.address == "42" && m.text.contains("accepted")));
    }

    #[tokio::test]
    async fn non_admin_action_is_refused_and_state_untouched() {
        let (service, channel, _dir) = started_service().await;
        let alice = identity("42", Some("alice"));
        service.text_received(&alice, "Repair").await;
        service.text_received(&alice, "laptop won't boot").await;
        let ticket_id = service.list_tickets().await[0].id.clone();
        channel.sent.lock().await.clear();

        let mallory = identity("666", Some("mallory"));
        service
            .action_received(&mallory, &format!("accept:{ticket_id}"))
            .await;

        assert_eq!(
            service.list_tickets().await[0].status,
            TicketStatus::Pending
        );
        let sent = channel.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].address, "666");
        assert_eq!(sent[0].text, text::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn repeat_resubmits_last_ticket_as_new() {
        let (service, _channel, _dir) = started_service().await;
        let alice = identity("42", Some("alice"));
        service.text_received(&alice, "Repair").await;
        service.text_received(&alice, "laptop won't boot").await;

        service.text_received(&alice, text::REPEAT_LABEL).await;

        let tickets = service.list_tickets().await;
        assert_eq!(tickets.len(), 2);
        assert_ne!(tickets[0].id, tickets[1].id);
        assert_eq!(tickets[1].category, TicketCategory::Repair);
        assert_eq!(tickets[1].description, "laptop won't boot");
        assert_eq!(tickets[1].status, TicketStatus::Pending);
    }

    #[tokio::test]
    async fn observer_gets_exact_snapshot_then_live_events() {
        let (service, _channel, _dir) = started_service().await;
        let alice = identity("42", Some("alice"));
        service.text_received(&alice, "Repair").await;
        service.text_received(&alice, "first").await;

        let (tx, mut rx) = mpsc::channel(16);
        service.attach_observer("obs-1", tx).await;

        let init = rx.recv().await.unwrap();
        let event: DeskEvent = serde_json::from_str(&init).unwrap();
        let DeskEvent::Init { tickets, bot_state } = event else {
            panic!("expected INIT first, got {init}");
        };
        assert_eq!(tickets, service.list_tickets().await);
        assert!(bot_state.is_running);

        service.text_received(&alice, "Repair").await;
        service.text_received(&alice, "second").await;

        // Skip nothing: the very next event is the new ticket.
        let next = rx.recv().await.unwrap();
        let event: DeskEvent = serde_json::from_str(&next).unwrap();
        let DeskEvent::NewRequest { ticket } = event else {
            panic!("expected NEW_REQUEST, got {next}");
        };
        assert_eq!(ticket.description, "second");
    }

    #[tokio::test]
    async fn observer_update_unknown_id_is_not_found_and_silent() {
        let (service, _channel, _dir) = started_service().await;
        let (tx, mut rx) = mpsc::channel(16);
        service.attach_observer("obs-1", tx).await;
        rx.recv().await.unwrap(); // INIT

        let err = service
            .update_status_from_observer("missing", TicketStatus::InProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::TicketNotFound { .. }));
        assert!(rx.try_recv().is_err(), "no broadcast for a failed transition");
    }

    #[tokio::test]
    async fn observer_update_broadcasts_and_notifies_requester() {
        let (service, channel, _dir) = started_service().await;
        let alice = identity("42", Some("alice"));
        service.text_received(&alice, "Repair").await;
        service.text_received(&alice, "laptop won't boot").await;
        let ticket_id = service.list_tickets().await[0].id.clone();

        let (tx, mut rx) = mpsc::channel(16);
        service.attach_observer("obs-1", tx).await;
        rx.recv().await.unwrap(); // INIT
        channel.sent.lock().await.clear();

        let ticket = service
            .update_status_from_observer(&ticket_id, TicketStatus::Completed)
            .await
            .unwrap();
        assert_eq!(ticket.status, TicketStatus::Completed);

        let event: DeskEvent = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert!(matches!(event, DeskEvent::UpdateRequest { .. }));

        let sent = channel.sent().await;
        assert!(sent
            .iter()
            .any(|m| m.address == "42" && m.text.contains("complete")));
    }

    #[tokio::test]
    async fn start_and_stop_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let channel = Arc::new(RecordingChannel::new());
        let service = DeskService::new(store, channel, None);

        assert!(service.start().await);
        assert!(!service.start().await);
        assert!(service.is_running());

        assert!(service.stop().await);
        assert!(!service.stop().await);
        assert!(!service.is_running());
    }

    #[tokio::test]
    async fn stopped_desk_ignores_chat_events() {
        let (service, channel, _dir) = started_service().await;
        service.stop().await;
        channel.sent.lock().await.clear();

        let alice = identity("42", Some("alice"));
        service.session_started(&alice).await;
        service.text_received(&alice, "Repair").await;
        service.text_received(&alice, "laptop won't boot").await;

        assert!(service.list_tickets().await.is_empty());
        assert!(channel.sent().await.is_empty());
    }

    #[tokio::test]
    async fn state_survives_restart_via_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let channel = Arc::new(RecordingChannel::new());
        {
            let store = SnapshotStore::open(dir.path()).unwrap();
            let service = DeskService::new(store, channel.clone(), None);
            service.start().await;
            let alice = identity("42", Some("alice"));
            service.text_received(&alice, "Repair").await;
            service.text_received(&alice, "laptop won't boot").await;
            service.add_subscriber("oncall", "2002", true).await;
        }

        let store = SnapshotStore::open(dir.path()).unwrap();
        let service = DeskService::new(store, channel, None);
        let tickets = service.list_tickets().await;
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].description, "laptop won't boot");
        let subscribers = service.list_subscribers().await;
        assert_eq!(subscribers.len(), 1);
        assert_eq!(subscribers[0].handle, "oncall");
    }
}
