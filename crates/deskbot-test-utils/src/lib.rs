// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Deskbot integration tests.
//!
//! Provides a mock messaging channel and a harness that assembles a full
//! desk service over a temp snapshot directory, for fast, deterministic,
//! CI-runnable tests without Telegram.
//!
//! # Components
//!
//! - [`MockChannel`] - captures outbound chat messages, with injectable per-address failures
//! - [`TestHarness`] - a started desk service plus the mock channel and chat identities

pub mod harness;
pub mod mock_channel;

pub use harness::TestHarness;
pub use mock_channel::{MockChannel, SentMessage};
