// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for trakind.

use thiserror::Error;

use crate::types::ChatId;

/// The primary error type used across all trakind adapter traits and core operations.
#[derive(Debug, Error)]
pub enum TrakindError {
    /// Configuration errors (missing bot token, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors that may succeed on a later attempt.
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The recipient can never be reached again (blocked the bot, deactivated account).
    #[error("recipient {chat_id} is permanently unreachable: {reason}")]
    RecipientGone { chat_id: ChatId, reason: String },

    /// Scheduling API errors (transport failure, bad status, undecodable body).
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed domain values (bad date, party size out of range, unknown action).
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TrakindError {
    /// Returns `true` when a delivery failed because the recipient is gone for good.
    ///
    /// Subscriptions of such recipients are deleted by the tracker.
    pub fn is_recipient_gone(&self) -> bool {
        matches!(self, TrakindError::RecipientGone { .. })
    }
}

/// Failure to parse a calendar date or time of day.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input does not follow the expected `YYYY-MM-DD` / `HH:MM` layout.
    #[error("invalid format for {input:?}, expected {expected}")]
    InvalidFormat {
        input: String,
        expected: &'static str,
    },
}

impl From<ParseError> for TrakindError {
    fn from(err: ParseError) -> Self {
        TrakindError::Validation(err.to_string())
    }
}
