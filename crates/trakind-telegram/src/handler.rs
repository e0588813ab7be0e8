// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of Telegram updates into channel-agnostic inbound messages.

use teloxide::types::Message;
use trakind_core::{ChatId, InboundMessage};

/// Reduces a Telegram message to chat id and text.
///
/// Only text messages drive the dialogue; stickers, photos and the like
/// yield `None`.
pub fn to_inbound_message(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?;
    Some(InboundMessage::new(ChatId(msg.chat.id.0), text))
}
