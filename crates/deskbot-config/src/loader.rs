// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./deskbot.toml` > `~/.config/deskbot/deskbot.toml`
//! > `/etc/deskbot/deskbot.toml`, with environment variable overrides via
//! the `DESKBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DeskbotConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/deskbot/deskbot.toml` (system-wide)
/// 3. `~/.config/deskbot/deskbot.toml` (user XDG config)
/// 4. `./deskbot.toml` (local directory)
/// 5. `DESKBOT_*` environment variables
pub fn load_config() -> Result<DeskbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DeskbotConfig::default()))
        .merge(Toml::file("/etc/deskbot/deskbot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("deskbot/deskbot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("deskbot.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DeskbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DeskbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DeskbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DeskbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DESKBOT_TELEGRAM_BOT_TOKEN` must map
/// to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("DESKBOT_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: DESKBOT_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let mapped = key
            .as_str()
            .replacen("desk_", "desk.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}
