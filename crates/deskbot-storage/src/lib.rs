// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON snapshot persistence for the Deskbot helpdesk bridge.
//!
//! Two independent whole-collection snapshots, `tickets.json` and
//! `subscribers.json`, re-read at startup and rewritten after every
//! mutation. No incremental format, no schema versioning. Reads fail open:
//! a missing or unreadable snapshot starts the registry empty.

pub mod snapshot;

pub use snapshot::SnapshotStore;
