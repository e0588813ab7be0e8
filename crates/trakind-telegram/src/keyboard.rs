// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply keyboards.

use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};
use trakind_core::Markup;

/// Telegram markup for `markup`; `None` sends the message without any.
pub fn reply_markup(markup: &Markup) -> Option<ReplyMarkup> {
    match markup {
        Markup::None => None,
        Markup::RemoveKeyboard => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        Markup::Keyboard(keyboard) => {
            let rows = keyboard
                .rows
                .iter()
                .map(|row| row.iter().map(KeyboardButton::new).collect::<Vec<_>>());
            Some(ReplyMarkup::Keyboard(
                KeyboardMarkup::new(rows)
                    .one_time_keyboard()
                    .resize_keyboard(),
            ))
        }
    }
}
