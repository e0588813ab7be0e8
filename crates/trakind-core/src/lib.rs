// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the trakind appointment tracker.
//!
//! This crate provides the domain model, the static action/location catalog,
//! the matching predicate, the error type and the adapter traits used
//! throughout the workspace.

pub mod catalog;
pub mod error;
pub mod matching;
pub mod traits;
pub mod types;

pub use error::{ParseError, TrakindError};
pub use types::{
    Action, AdapterType, ChatId, Date, HealthStatus, InboundMessage, Keyboard, Location, Markup,
    MessageId, OutboundMessage, SlotsResponse, Subscription, TimeOfDay, TimeWindow,
};

pub use traits::{ChannelAdapter, PluginAdapter, SubscriptionStore, UserCounter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [AdapterType::Channel, AdapterType::Storage] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        assert_eq!(HealthStatus::Healthy, HealthStatus::Healthy);
        assert_ne!(HealthStatus::Degraded("slow".into()), HealthStatus::Healthy);
    }

    #[test]
    fn all_traits_are_object_safe() {
        fn _channel(_: &dyn ChannelAdapter) {}
        fn _store(_: &dyn SubscriptionStore) {}
        fn _counter(_: &dyn UserCounter) {}
        fn _plugin(_: &dyn PluginAdapter) {}
    }
}
