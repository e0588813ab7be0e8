// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat transport trait.

use async_trait::async_trait;

use crate::error::TrakindError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundMessage, MessageId, OutboundMessage};

/// Bidirectional chat transport.
///
/// `receive` yields inbound messages in the order the platform delivered
/// them. `send` reports a recipient that can never be reached again as
/// [`TrakindError::RecipientGone`]; every other failure is transient.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), TrakindError>;

    /// Sends a message, optionally with a set of reply options.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, TrakindError>;

    /// Receives the next inbound message.
    async fn receive(&self) -> Result<InboundMessage, TrakindError>;

    /// Publishes the bot's command menu as `(command, description)` pairs.
    async fn register_commands(&self, _commands: &[(&str, &str)]) -> Result<(), TrakindError> {
        Ok(())
    }
}
