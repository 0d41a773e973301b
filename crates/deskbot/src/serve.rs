// SPDX-FileCopyrightText: 2026 Deskbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `deskbot serve` command implementation.
//!
//! Wires the snapshot store, the desk service, the Telegram long-polling
//! adapter, and the dashboard gateway together, then runs until the
//! gateway fails or a shutdown signal arrives. Telegram stays off when no
//! bot token is configured; the gateway still serves the persisted state.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use deskbot_config::model::DeskbotConfig;
use deskbot_core::{ActionSet, DeskError, MessagingChannel};
use deskbot_desk::DeskService;
use deskbot_gateway::{start_server, GatewayState, ServerConfig};
use deskbot_storage::SnapshotStore;
use deskbot_telegram::{run_polling, TelegramChannel};

/// Stand-in channel used when Telegram is not configured. Sends are
/// dropped after a debug log so the desk logic stays exercisable from the
/// dashboard alone.
struct DisabledChannel;

#[async_trait]
impl MessagingChannel for DisabledChannel {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn send_message(
        &self,
        address: &str,
        _text: &str,
        _actions: Option<ActionSet>,
    ) -> Result<(), DeskError> {
        debug!(%address, "chat disabled, dropping outbound message");
        Ok(())
    }
}

/// Runs the `deskbot serve` command.
pub async fn run_serve(config: DeskbotConfig) -> Result<(), DeskError> {
    init_tracing(&config.desk.log_level);

    info!(name = %config.desk.name, "starting deskbot serve");

    let store = SnapshotStore::open(&config.storage.data_dir)?;

    let (channel, bot): (Arc<dyn MessagingChannel>, _) = if config.telegram.bot_token.is_some() {
        let telegram = TelegramChannel::new(&config.telegram)?;
        let bot = telegram.bot().clone();
        (Arc::new(telegram), Some(bot))
    } else {
        info!("telegram disabled (no bot token configured)");
        (Arc::new(DisabledChannel), None)
    };

    let service = Arc::new(DeskService::new(
        store,
        channel,
        config.telegram.admin_handle.clone(),
    ));
    service.start().await;

    if let Some(bot) = bot {
        let polling_service = service.clone();
        tokio::spawn(run_polling(bot, polling_service));
    }

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    let gateway_state = GatewayState {
        service: service.clone(),
    };
    let gateway = tokio::spawn(async move { start_server(&server_config, gateway_state).await });

    tokio::select! {
        result = gateway => {
            match result {
                Ok(result) => result?,
                Err(error) => {
                    return Err(DeskError::Channel {
                        message: format!("gateway task failed: {error}"),
                        source: Some(Box::new(error)),
                    });
                }
            }
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(error) = signal {
                warn!(%error, "failed to listen for shutdown signal");
            }
            info!("shutdown signal received");
            service.stop().await;
        }
    }

    info!("deskbot serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deskbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
