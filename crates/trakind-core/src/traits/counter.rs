// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::TrakindError;

/// Process-wide count of chats that started the bot.
#[async_trait]
pub trait UserCounter: Send + Sync + 'static {
    async fn increment(&self) -> Result<u64, TrakindError>;

    /// Never drops below zero.
    async fn decrement(&self) -> Result<u64, TrakindError>;

    async fn get(&self) -> Result<u64, TrakindError>;
}
