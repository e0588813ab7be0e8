// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot tracking for trakind.
//!
//! Every `(office, action, party size)` combination is polled on its own
//! task. Subscribers whose cut-off date admits the earliest open window are
//! notified; subscriptions of unreachable recipients are deleted.

pub mod client;
pub mod engine;
pub mod notify;
pub mod poller;
pub mod report;

pub use client::{FetchError, SlotsClient, decode_slots_body};
pub use engine::TrackerEngine;
pub use notify::{Delivery, Notifier};
pub use poller::{Poller, TickOutcome};
pub use report::{SubscriptionReport, collect_report};
