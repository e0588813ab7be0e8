// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot notifications.

use std::sync::Arc;

use tracing::{info, warn};

use trakind_core::{
    Action, ChannelAdapter, Location, OutboundMessage, Subscription, SubscriptionStore,
    TimeWindow,
};

/// What happened to one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// The recipient is gone and its subscription was deleted.
    Removed,
    Failed,
}

pub fn notification_text(
    action: &Action,
    location: &Location,
    window: &TimeWindow,
    additional: usize,
) -> String {
    format!(
        "A slot is available for {} at {} on {} at {} and {} more.",
        action.name, location.name, window.date, window.start_time, additional
    )
}

/// Sends notifications and deletes subscriptions of recipients that can
/// no longer be reached.
#[derive(Clone)]
pub struct Notifier {
    channel: Arc<dyn ChannelAdapter>,
    store: Arc<dyn SubscriptionStore>,
}

impl Notifier {
    pub fn new(channel: Arc<dyn ChannelAdapter>, store: Arc<dyn SubscriptionStore>) -> Self {
        Self { channel, store }
    }

    pub async fn notify(
        &self,
        location: &Location,
        action: &Action,
        subscription: &Subscription,
        window: &TimeWindow,
        additional: usize,
    ) -> Delivery {
        let text = notification_text(action, location, window, additional);
        let err = match self
            .channel
            .send(OutboundMessage::text(subscription.chat_id, text))
            .await
        {
            Ok(_) => return Delivery::Sent,
            Err(e) => e,
        };

        warn!(
            chat_id = %subscription.chat_id,
            location = location.code,
            error = %err,
            "failed to send notification"
        );
        if !err.is_recipient_gone() {
            return Delivery::Failed;
        }

        match self
            .store
            .remove_from_location(location.code, subscription)
            .await
        {
            Ok(()) => {
                info!(
                    chat_id = %subscription.chat_id,
                    location = location.code,
                    action = %subscription.action,
                    people_count = subscription.people_count,
                    "deleted subscription of unreachable recipient"
                );
                Delivery::Removed
            }
            Err(e) => {
                warn!(
                    chat_id = %subscription.chat_id,
                    location = location.code,
                    error = %e,
                    "failed to delete subscription"
                );
                Delivery::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trakind_core::catalog::{DOCUMENT_PICKUP, location_by_code};
    use trakind_core::{ChatId, Date, Markup, TimeOfDay};
    use trakind_test_utils::{MemoryStore, MockChannel, SendFailure};

    fn window() -> TimeWindow {
        TimeWindow {
            date: Date::parse("2024-05-20").unwrap(),
            start_time: TimeOfDay::parse("09:05").unwrap(),
            end_time: TimeOfDay::parse("09:20").unwrap(),
            party_size: 2,
        }
    }

    #[test]
    fn text_names_action_location_and_time() {
        let am = location_by_code("AM").unwrap();
        assert_eq!(
            notification_text(&DOCUMENT_PICKUP, am, &window(), 3),
            "A slot is available for Document pickup at IND Amsterdam on 2024-05-20 at 09:05 and 3 more."
        );
    }

    #[tokio::test]
    async fn notification_leaves_keyboard_alone() {
        let channel = Arc::new(MockChannel::new());
        let store = Arc::new(MemoryStore::new());
        let sub = Subscription::new(ChatId(42), 2, &DOCUMENT_PICKUP, None).unwrap();

        let notifier = Notifier::new(channel.clone(), store);
        let am = location_by_code("AM").unwrap();
        let outcome = notifier.notify(am, &DOCUMENT_PICKUP, &sub, &window(), 0).await;
        assert_eq!(outcome, Delivery::Sent);
        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].markup, Markup::None);
    }

    #[tokio::test]
    async fn transient_failure_keeps_subscription() {
        let channel = Arc::new(MockChannel::new());
        let store = Arc::new(MemoryStore::new());
        let sub = Subscription::new(ChatId(42), 2, &DOCUMENT_PICKUP, None).unwrap();
        store.add_to_location("AM", &sub).await.unwrap();
        channel.fail_for(ChatId(42), SendFailure::Transient).await;

        let notifier = Notifier::new(channel.clone(), store.clone());
        let am = location_by_code("AM").unwrap();
        let outcome = notifier.notify(am, &DOCUMENT_PICKUP, &sub, &window(), 0).await;
        assert_eq!(outcome, Delivery::Failed);
        assert_eq!(store.entries("AM").await, vec![sub]);
    }

    #[tokio::test]
    async fn gone_recipient_is_removed() {
        let channel = Arc::new(MockChannel::new());
        let store = Arc::new(MemoryStore::new());
        let sub = Subscription::new(ChatId(42), 2, &DOCUMENT_PICKUP, None).unwrap();
        store.add_to_location("AM", &sub).await.unwrap();
        channel.fail_for(ChatId(42), SendFailure::Gone).await;

        let notifier = Notifier::new(channel, store.clone());
        let am = location_by_code("AM").unwrap();
        let outcome = notifier.notify(am, &DOCUMENT_PICKUP, &sub, &window(), 0).await;
        assert_eq!(outcome, Delivery::Removed);
        assert!(store.entries("AM").await.is_empty());
    }
}
