// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of Bot API failures.

use teloxide::{ApiError, RequestError};
use trakind_core::{ChatId, TrakindError};

/// Whether the API error means the chat can never receive messages again.
pub fn is_permanent(err: &RequestError) -> bool {
    matches!(
        err,
        RequestError::Api(
            ApiError::BotBlocked
                | ApiError::UserDeactivated
                | ApiError::ChatNotFound
                | ApiError::BotKicked
                | ApiError::BotKickedFromSupergroup
        )
    )
}

/// Maps a failed send to `RecipientGone` or a retryable `Channel` error.
pub fn classify_send_error(chat_id: ChatId, err: RequestError) -> TrakindError {
    if is_permanent(&err) {
        TrakindError::RecipientGone {
            chat_id,
            reason: err.to_string(),
        }
    } else {
        TrakindError::Channel {
            message: format!("failed to send message: {err}"),
            source: Some(Box::new(err)),
        }
    }
}
