// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ticket desk core: registry, conversation sessions, admin fan-out,
//! live broadcast, and the service that sequences them.
//!
//! All registry mutations run under one `tokio::sync::Mutex`, preserving
//! the single-logical-writer model: mutate, persist, broadcast under the
//! lock, then release and fan out chat notifications.

pub mod broadcast;
pub mod notify;
pub mod registry;
pub mod service;
pub mod session;
pub mod text;

pub use broadcast::BroadcastHub;
pub use notify::AdminNotifier;
pub use registry::TicketRegistry;
pub use service::DeskService;
pub use session::{SessionTracker, Stage};
