// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Transports and stores extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so they can be shared as trait objects.

pub mod adapter;
pub mod channel;
pub mod counter;
pub mod storage;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use counter::UserCounter;
pub use storage::SubscriptionStore;
