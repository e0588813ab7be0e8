// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for trakind.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling for inbound text, reply keyboards for prompts and
//! classification of permanent delivery failures.

pub mod error;
pub mod handler;
pub mod keyboard;

use async_trait::async_trait;
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use trakind_config::model::TelegramConfig;
use trakind_core::types::OutboundMessage;
use trakind_core::{
    AdapterType, ChannelAdapter, HealthStatus, InboundMessage, MessageId, PluginAdapter,
    TrakindError,
};

/// Inbound updates buffered between the poller and the dialogue dispatcher.
const INBOUND_BUFFER: usize = 100;

/// Telegram channel adapter implementing [`ChannelAdapter`].
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    shutdown_token: Option<ShutdownToken>,
}

impl TelegramChannel {
    /// Requires `config.bot_token` to be set and non-empty.
    pub fn new(config: &TelegramConfig) -> Result<Self, TrakindError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            TrakindError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.trim().is_empty() {
            return Err(TrakindError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_BUFFER);

        Ok(Self {
            bot: Bot::new(token.trim()),
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            shutdown_token: None,
        })
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, TrakindError> {
        match self.bot.get_me().await {
            Ok(me) => {
                debug!(username = ?me.username, "Telegram bot reachable");
                Ok(HealthStatus::Healthy)
            }
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), TrakindError> {
        let Some(token) = &self.shutdown_token else {
            return Ok(());
        };
        match token.shutdown() {
            Ok(stopped) => {
                stopped.await;
                debug!("Telegram polling stopped");
            }
            Err(_) => debug!("Telegram dispatcher was not running"),
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), TrakindError> {
        if self.shutdown_token.is_some() {
            return Ok(());
        }

        let tx = self.inbound_tx.clone();
        let handler = Update::filter_message().endpoint(move |msg: Message| {
            let tx = tx.clone();
            async move {
                match handler::to_inbound_message(&msg) {
                    Some(inbound) => {
                        if tx.send(inbound).await.is_err() {
                            warn!("inbound channel closed, dropping message");
                        }
                    }
                    None => debug!(chat_id = msg.chat.id.0, "ignoring non-text message"),
                }
                respond(())
            }
        });

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|_| async {})
            .build();
        self.shutdown_token = Some(dispatcher.shutdown_token());

        info!("starting Telegram long polling");
        tokio::spawn(async move {
            dispatcher.dispatch().await;
        });
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, TrakindError> {
        let mut request = self
            .bot
            .send_message(teloxide::types::ChatId(msg.chat_id.0), msg.text);
        if let Some(markup) = keyboard::reply_markup(&msg.markup) {
            request = request.reply_markup(markup);
        }
        let sent = request
            .await
            .map_err(|e| error::classify_send_error(msg.chat_id, e))?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn receive(&self) -> Result<InboundMessage, TrakindError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| TrakindError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }

    async fn register_commands(&self, commands: &[(&str, &str)]) -> Result<(), TrakindError> {
        let commands: Vec<BotCommand> = commands
            .iter()
            .map(|(name, description)| BotCommand::new(*name, *description))
            .collect();
        self.bot
            .set_my_commands(commands)
            .await
            .map_err(|e| TrakindError::Channel {
                message: format!("failed to register commands: {e}"),
                source: Some(Box::new(e)),
            })?;
        info!("bot commands registered");
        Ok(())
    }
}
