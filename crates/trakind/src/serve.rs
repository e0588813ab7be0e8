// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trakind serve`: wires storage, Telegram, the dialogue and the tracker.

use std::sync::Arc;

use tracing::{info, warn};

use trakind_config::TrakindConfig;
use trakind_core::{ChannelAdapter, HealthStatus, PluginAdapter, TrakindError};
use trakind_dialogue::{COMMANDS, DialogueRouter, DialogueServices};
use trakind_storage::SqliteStorage;
use trakind_telegram::TelegramChannel;
use trakind_tracker::{SlotsClient, TrackerEngine};

use crate::shutdown::install_signal_handler;

/// Runs until SIGINT/SIGTERM, then drains and returns.
pub async fn run_serve(config: TrakindConfig) -> Result<(), TrakindError> {
    init_tracing(&config.agent.log_level);
    info!("starting trakind serve");

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage = Arc::new(storage);

    let mut telegram = TelegramChannel::new(&config.telegram)?;
    match telegram.health_check().await? {
        HealthStatus::Healthy => {}
        HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => {
            return Err(TrakindError::Channel {
                message: reason,
                source: None,
            });
        }
    }
    if config.telegram.register_commands {
        if let Err(e) = telegram.register_commands(COMMANDS).await {
            warn!(error = %e, "failed to register bot commands");
        }
    }
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let cancel = install_signal_handler();

    let client = SlotsClient::new(&config.tracker)?;
    let engine = TrackerEngine::start(
        &config.tracker,
        client,
        channel.clone(),
        storage.clone(),
        &cancel,
    );

    let router = DialogueRouter::new(DialogueServices {
        channel: channel.clone(),
        store: storage.clone(),
        counter: storage.clone(),
    });
    router.run(cancel.clone()).await?;

    engine.shutdown().await;
    if let Err(e) = channel.shutdown().await {
        warn!(error = %e, "telegram shutdown failed");
    }
    if let Err(e) = storage.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }

    info!("trakind serve shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trakind={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
