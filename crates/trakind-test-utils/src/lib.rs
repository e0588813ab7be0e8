// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for trakind.
//!
//! - [`MockChannel`]: a chat transport with injectable inbound messages,
//!   captured outbound messages and per-chat failure injection.
//! - [`MemoryStore`]: an in-memory subscription store and user counter with
//!   failure injection.

pub mod memory_store;
pub mod mock_channel;

pub use memory_store::MemoryStore;
pub use mock_channel::{MockChannel, SendFailure};
