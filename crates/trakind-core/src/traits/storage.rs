// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription store trait.

use async_trait::async_trait;

use crate::error::TrakindError;
use crate::types::Subscription;

/// Durable collection of subscriptions keyed by location code.
///
/// All methods are safe to call concurrently from the dialogue and every
/// poller. A location with no entries is empty, never an error.
#[async_trait]
pub trait SubscriptionStore: Send + Sync + 'static {
    async fn add_to_location(
        &self,
        location: &str,
        subscription: &Subscription,
    ) -> Result<(), TrakindError>;

    /// Removes every entry equal by value to `subscription`.
    /// Removing an absent entry is a no-op.
    async fn remove_from_location(
        &self,
        location: &str,
        subscription: &Subscription,
    ) -> Result<(), TrakindError>;

    async fn get_for_location(&self, location: &str) -> Result<Vec<Subscription>, TrakindError>;

    async fn count_for_location(&self, location: &str) -> Result<usize, TrakindError>;
}
