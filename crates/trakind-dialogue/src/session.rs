// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One chat's dialogue.
//!
//! [`DialogueSession::handle`] feeds a user message to the current state.
//! Entering a state runs its side effect (a prompt, a store write) and may
//! name a follow-up state, which is entered in turn until a state waits for
//! input or the session reaches [`DialogueState::Done`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use trakind_core::catalog::{self, LOCATIONS};
use trakind_core::types::{MAX_PEOPLE, MIN_PEOPLE};
use trakind_core::{
    Action, ChannelAdapter, ChatId, Date, InboundMessage, Keyboard, Location, OutboundMessage,
    Subscription, SubscriptionStore, UserCounter,
};

use crate::prompts;
use crate::state::DialogueState;

/// Collaborators shared by every session.
#[derive(Clone)]
pub struct DialogueServices {
    pub channel: Arc<dyn ChannelAdapter>,
    pub store: Arc<dyn SubscriptionStore>,
    pub counter: Arc<dyn UserCounter>,
}

/// Outcome of sending a prompt.
enum Sent {
    Ok,
    Failed,
}

pub struct DialogueSession {
    chat_id: ChatId,
    state: DialogueState,
    services: DialogueServices,
}

impl DialogueSession {
    pub fn new(chat_id: ChatId, services: DialogueServices) -> Self {
        Self {
            chat_id,
            state: DialogueState::Initial,
            services,
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// Processes one message from this chat.
    ///
    /// A recognised command always restarts the flow at command dispatch,
    /// dropping whatever was selected so far.
    pub async fn handle(&mut self, msg: &InboundMessage) {
        if msg.is_command() && self.state.awaits_input() {
            self.transition(DialogueState::CommandDispatch, msg).await;
            return;
        }

        let next = match self.state {
            DialogueState::Initial => {
                self.send(prompts::SELECT_COMMAND, None).await;
                Some(DialogueState::Done)
            }
            DialogueState::WhichAction => self.on_which_action(&msg.text).await,
            DialogueState::WhichLocation { action } => {
                self.on_which_location(action, &msg.text).await
            }
            DialogueState::HowManyPeople { action, location } => {
                self.on_how_many_people(action, location, &msg.text).await
            }
            DialogueState::BeforeDate {
                action,
                location,
                people_count,
            } => {
                self.on_before_date(action, location, people_count, &msg.text)
                    .await
            }
            state => {
                debug!(chat_id = %self.chat_id, %state, "message ignored in non-input state");
                None
            }
        };

        if let Some(next) = next {
            self.transition(next, msg).await;
        }
    }

    async fn on_which_action(&self, text: &str) -> Option<DialogueState> {
        match catalog::action_by_name(text) {
            Some(action) => Some(DialogueState::WhichLocation { action }),
            None => {
                self.prompt(prompts::unknown_action(text), Some(prompts::actions_keyboard()))
                    .await
            }
        }
    }

    async fn on_which_location(&self, action: &'static Action, text: &str) -> Option<DialogueState> {
        match catalog::location_for_name(text, action) {
            Some(location) => Some(DialogueState::HowManyPeople { action, location }),
            None => {
                self.prompt(
                    prompts::unknown_location(text),
                    Some(prompts::locations_keyboard(action)),
                )
                .await
            }
        }
    }

    async fn on_how_many_people(
        &self,
        action: &'static Action,
        location: &'static Location,
        text: &str,
    ) -> Option<DialogueState> {
        let count = match text.trim().parse::<i64>() {
            Ok(count) => count,
            Err(_) => {
                return self
                    .prompt(prompts::people_not_a_number(), Some(prompts::people_keyboard()))
                    .await;
            }
        };
        match u8::try_from(count) {
            Ok(people_count) if (MIN_PEOPLE..=MAX_PEOPLE).contains(&people_count) => {
                Some(DialogueState::BeforeDate {
                    action,
                    location,
                    people_count,
                })
            }
            _ => {
                self.prompt(prompts::people_out_of_range(count), Some(prompts::people_keyboard()))
                    .await
            }
        }
    }

    async fn on_before_date(
        &self,
        action: &'static Action,
        location: &'static Location,
        people_count: u8,
        text: &str,
    ) -> Option<DialogueState> {
        let track_before = if text.trim().eq_ignore_ascii_case(prompts::ALL_DATES) {
            None
        } else {
            match Date::parse(text) {
                Ok(date) => Some(date),
                Err(_) => return self.prompt(prompts::bad_date(text), None).await,
            }
        };

        let stored = match Subscription::new(self.chat_id, people_count, action, track_before) {
            Ok(subscription) => self
                .services
                .store
                .add_to_location(location.code, &subscription)
                .await
                .map(|()| subscription),
            Err(e) => Err(e),
        };

        match stored {
            Ok(subscription) => {
                info!(
                    chat_id = %self.chat_id,
                    location = location.code,
                    action = %subscription.action,
                    people_count,
                    "one more follower"
                );
                self.send(
                    prompts::subscribed(action, location, people_count, track_before),
                    None,
                )
                .await;
            }
            Err(e) => {
                warn!(chat_id = %self.chat_id, location = location.code, error = %e, "failed to store subscription");
                self.send(prompts::SUBSCRIPTION_FAILED, None).await;
            }
        }
        Some(DialogueState::Done)
    }

    /// Enters `next` and every follow-up state it names.
    async fn transition(&mut self, mut next: DialogueState, msg: &InboundMessage) {
        loop {
            debug!(chat_id = %self.chat_id, from = %self.state, to = %next, "state transition");
            self.state = next;
            match self.enter(msg).await {
                Some(following) => next = following,
                None => return,
            }
        }
    }

    /// Runs the entry action of the current state.
    async fn enter(&self, msg: &InboundMessage) -> Option<DialogueState> {
        match self.state {
            DialogueState::Initial | DialogueState::Done => None,
            DialogueState::CommandDispatch => Some(self.dispatch_command(msg).await),
            DialogueState::WhichAction => {
                self.prompt(prompts::WHICH_ACTION, Some(prompts::actions_keyboard()))
                    .await
            }
            DialogueState::WhichLocation { action } => {
                self.prompt(
                    prompts::WHICH_LOCATION,
                    Some(prompts::locations_keyboard(action)),
                )
                .await
            }
            DialogueState::HowManyPeople { .. } => {
                self.prompt(prompts::HOW_MANY_PEOPLE, Some(prompts::people_keyboard()))
                    .await
            }
            DialogueState::BeforeDate { .. } => self.prompt(prompts::BEFORE_DATE, None).await,
            DialogueState::StartCommand => {
                match self.services.counter.increment().await {
                    Ok(users) => info!(chat_id = %self.chat_id, users, "user started the bot"),
                    Err(e) => warn!(chat_id = %self.chat_id, error = %e, "failed to count user"),
                }
                self.send(prompts::WELCOME, None).await;
                Some(DialogueState::Done)
            }
            DialogueState::StopCommand => {
                self.unsubscribe_everywhere().await;
                match self.services.counter.decrement().await {
                    Ok(users) => info!(chat_id = %self.chat_id, users, "user stopped the bot"),
                    Err(e) => warn!(chat_id = %self.chat_id, error = %e, "failed to uncount user"),
                }
                Some(DialogueState::Done)
            }
            DialogueState::StopTrackCommand => {
                self.unsubscribe_everywhere().await;
                self.send(prompts::TRACKING_STOPPED, None).await;
                Some(DialogueState::Done)
            }
        }
    }

    async fn dispatch_command(&self, msg: &InboundMessage) -> DialogueState {
        match msg.command_name() {
            Some("start") => DialogueState::StartCommand,
            Some("stop") => DialogueState::StopCommand,
            Some("track") => DialogueState::WhichAction,
            Some("stoptrack") => DialogueState::StopTrackCommand,
            Some(name) => {
                self.send(prompts::unknown_command(name), None).await;
                DialogueState::Done
            }
            None => DialogueState::Done,
        }
    }

    /// Removes this chat's subscriptions at every location.
    ///
    /// Failures at one location are logged and the rest still run.
    async fn unsubscribe_everywhere(&self) {
        let store = &self.services.store;
        for location in LOCATIONS {
            let subscriptions = match store.get_for_location(location.code).await {
                Ok(subscriptions) => subscriptions,
                Err(e) => {
                    warn!(chat_id = %self.chat_id, location = location.code, error = %e, "failed to list subscriptions");
                    continue;
                }
            };
            for subscription in subscriptions.iter().filter(|s| s.chat_id == self.chat_id) {
                match store.remove_from_location(location.code, subscription).await {
                    Ok(()) => info!(
                        chat_id = %self.chat_id,
                        location = location.code,
                        action = %subscription.action,
                        people_count = subscription.people_count,
                        "one less follower"
                    ),
                    Err(e) => {
                        warn!(chat_id = %self.chat_id, location = location.code, error = %e, "failed to remove subscription")
                    }
                }
            }
        }
    }

    /// Sends a prompt or a correction after invalid input. The state does
    /// not change unless the message cannot be delivered.
    async fn prompt(
        &self,
        text: impl Into<String>,
        keyboard: Option<Keyboard>,
    ) -> Option<DialogueState> {
        match self.send(text, keyboard).await {
            Sent::Ok => None,
            Sent::Failed => Some(DialogueState::Done),
        }
    }

    async fn send(&self, text: impl Into<String>, keyboard: Option<Keyboard>) -> Sent {
        let msg = OutboundMessage::text(self.chat_id, text);
        let msg = match keyboard {
            Some(keyboard) => msg.with_keyboard(keyboard),
            None => msg.removing_keyboard(),
        };
        match self.services.channel.send(msg).await {
            Ok(_) => Sent::Ok,
            Err(e) => {
                warn!(chat_id = %self.chat_id, state = %self.state, error = %e, "failed to send message");
                Sent::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trakind_core::Markup;
    use trakind_core::catalog::{BIOMETRICS, DOCUMENT_PICKUP, location_by_code};
    use trakind_test_utils::{MemoryStore, MockChannel, SendFailure};

    const CHAT: i64 = 42;

    struct Harness {
        channel: Arc<MockChannel>,
        store: Arc<MemoryStore>,
        session: DialogueSession,
    }

    impl Harness {
        fn new() -> Self {
            let channel = Arc::new(MockChannel::new());
            let store = Arc::new(MemoryStore::new());
            let services = DialogueServices {
                channel: channel.clone(),
                store: store.clone(),
                counter: store.clone(),
            };
            Self {
                channel,
                store,
                session: DialogueSession::new(ChatId(CHAT), services),
            }
        }

        /// Routers start a fresh session once the previous one is done.
        fn restart(&mut self) {
            self.session = DialogueSession::new(ChatId(CHAT), self.session.services.clone());
        }

        async fn say(&mut self, text: &str) {
            self.session
                .handle(&InboundMessage::new(ChatId(CHAT), text))
                .await;
        }

        async fn last_text(&self) -> String {
            self.channel
                .texts_to(CHAT)
                .await
                .pop()
                .unwrap_or_default()
        }

        async fn last_keyboard(&self) -> Option<Keyboard> {
            self.channel.sent_messages().await.pop().and_then(|m| m.keyboard().cloned())
        }
    }

    fn am() -> &'static Location {
        location_by_code("AM").unwrap()
    }

    #[tokio::test]
    async fn full_track_flow_persists_subscription() {
        let mut h = Harness::new();

        h.say("/track").await;
        assert_eq!(h.session.state(), DialogueState::WhichAction);
        assert_eq!(h.last_text().await, prompts::WHICH_ACTION);
        assert_eq!(h.last_keyboard().await, Some(prompts::actions_keyboard()));

        h.say("Document pickup").await;
        assert_eq!(
            h.session.state(),
            DialogueState::WhichLocation {
                action: &DOCUMENT_PICKUP
            }
        );
        assert_eq!(h.last_text().await, prompts::WHICH_LOCATION);

        h.say("ind amsterdam").await;
        assert_eq!(
            h.session.state(),
            DialogueState::HowManyPeople {
                action: &DOCUMENT_PICKUP,
                location: am()
            }
        );

        h.say("2").await;
        assert_eq!(h.last_text().await, prompts::BEFORE_DATE);
        assert_eq!(h.last_keyboard().await, None);

        h.say("2024-06-01").await;
        assert!(h.session.is_done());
        assert_eq!(
            h.last_text().await,
            "You will now get a notification when an open time window found for Document pickup at the location IND Amsterdam for 2 people before 2024-06-01."
        );

        let stored = h.store.entries("AM").await;
        assert_eq!(
            stored,
            vec![Subscription {
                chat_id: ChatId(CHAT),
                people_count: 2,
                action: "DOC".into(),
                track_before: Some(Date::parse("2024-06-01").unwrap()),
            }]
        );
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn follower_changes_are_logged() {
        let mut h = Harness::new();
        for text in ["/track", "Document pickup", "IND Den Bosch", "1", "all"] {
            h.say(text).await;
        }
        assert!(logs_contain("one more follower"));
        h.restart();
        h.say("/stoptrack").await;
        assert!(logs_contain("one less follower"));
        assert!(logs_contain("state transition"));
    }

    #[tokio::test]
    async fn all_dates_is_case_insensitive() {
        let mut h = Harness::new();
        for text in ["/track", "Biometrics", "IND Haarlem", "1", "ALL"] {
            h.say(text).await;
        }
        assert!(h.session.is_done());
        let stored = h.store.entries("HLM").await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].action, BIOMETRICS.code);
        assert_eq!(stored[0].track_before, None);
    }

    #[tokio::test]
    async fn unknown_action_reprompts_with_options() {
        let mut h = Harness::new();
        h.say("/track").await;
        h.say("document pickup").await;
        assert_eq!(h.session.state(), DialogueState::WhichAction);
        assert_eq!(
            h.last_text().await,
            "Appointment type document pickup is not supported, please click on a button with one of the available appointment types."
        );
        assert_eq!(h.last_keyboard().await, Some(prompts::actions_keyboard()));
    }

    #[tokio::test]
    async fn location_must_support_action() {
        let mut h = Harness::new();
        h.say("/track").await;
        h.say("Document pickup").await;
        h.say("IND Haarlem").await;
        assert_eq!(
            h.session.state(),
            DialogueState::WhichLocation {
                action: &DOCUMENT_PICKUP
            }
        );
        assert!(h.last_text().await.starts_with("Location IND Haarlem is incorrect"));
    }

    #[tokio::test]
    async fn invalid_party_sizes_keep_asking() {
        let mut h = Harness::new();
        for text in ["/track", "Document pickup", "IND Amsterdam"] {
            h.say(text).await;
        }
        let asking = h.session.state();

        h.say("0").await;
        assert_eq!(h.session.state(), asking);
        assert_eq!(h.last_text().await, prompts::people_out_of_range(0));
        assert_eq!(h.last_keyboard().await, Some(prompts::people_keyboard()));

        h.say("7").await;
        assert_eq!(h.session.state(), asking);
        assert_eq!(h.last_text().await, prompts::people_out_of_range(7));

        for (text, count) in [("-1", -1), ("262", 262)] {
            h.say(text).await;
            assert_eq!(h.session.state(), asking);
            assert_eq!(h.last_text().await, prompts::people_out_of_range(count));
        }

        h.say("abc").await;
        assert_eq!(h.session.state(), asking);
        assert_eq!(h.last_text().await, prompts::people_not_a_number());

        h.say("3").await;
        assert_eq!(
            h.session.state(),
            DialogueState::BeforeDate {
                action: &DOCUMENT_PICKUP,
                location: am(),
                people_count: 3
            }
        );
    }

    #[tokio::test]
    async fn bad_date_reprompts() {
        let mut h = Harness::new();
        for text in ["/track", "Document pickup", "IND Amsterdam", "2", "01-06-2024"] {
            h.say(text).await;
        }
        assert!(matches!(h.session.state(), DialogueState::BeforeDate { .. }));
        assert_eq!(h.last_text().await, prompts::bad_date("01-06-2024"));
        let last = h.channel.sent_messages().await.pop().unwrap();
        assert_eq!(last.markup, Markup::RemoveKeyboard);
        assert_eq!(h.store.total().await, 0);
    }

    #[tokio::test]
    async fn command_interrupts_flow() {
        let mut h = Harness::new();
        for text in ["/track", "Document pickup", "IND Amsterdam"] {
            h.say(text).await;
        }
        h.say("/track").await;
        assert_eq!(h.session.state(), DialogueState::WhichAction);

        h.say("Biometrics").await;
        h.say("/stoptrack").await;
        assert!(h.session.is_done());
        assert_eq!(h.last_text().await, prompts::TRACKING_STOPPED);
        assert_eq!(h.store.total().await, 0);
    }

    #[tokio::test]
    async fn initial_plain_text_asks_for_command() {
        let mut h = Harness::new();
        h.say("hello").await;
        assert!(h.session.is_done());
        assert_eq!(h.channel.texts_to(CHAT).await, vec![prompts::SELECT_COMMAND]);
    }

    #[tokio::test]
    async fn unknown_command_is_reported() {
        let mut h = Harness::new();
        h.say("/foo").await;
        assert!(h.session.is_done());
        assert_eq!(h.last_text().await, prompts::unknown_command("foo"));
    }

    #[tokio::test]
    async fn start_counts_user_and_welcomes() {
        let mut h = Harness::new();
        h.say("/start").await;
        assert!(h.session.is_done());
        assert_eq!(h.store.users().await, 1);
        assert_eq!(h.last_text().await, prompts::WELCOME);
    }

    #[tokio::test]
    async fn stop_unsubscribes_and_uncounts() {
        let mut h = Harness::new();
        h.session
            .services
            .counter
            .increment()
            .await
            .unwrap();
        let mine = Subscription::new(ChatId(CHAT), 2, &DOCUMENT_PICKUP, None).unwrap();
        let theirs = Subscription::new(ChatId(7), 2, &DOCUMENT_PICKUP, None).unwrap();
        h.store.add_to_location("AM", &mine).await.unwrap();
        h.store.add_to_location("DH", &mine).await.unwrap();
        h.store.add_to_location("AM", &theirs).await.unwrap();

        h.say("/stop").await;
        assert!(h.session.is_done());
        assert_eq!(h.store.users().await, 0);
        assert_eq!(h.store.entries("AM").await, vec![theirs]);
        assert!(h.store.entries("DH").await.is_empty());
        assert!(h.channel.texts_to(CHAT).await.is_empty());
    }

    #[tokio::test]
    async fn stoptrack_skips_failing_locations() {
        let mut h = Harness::new();
        let mine = Subscription::new(ChatId(CHAT), 1, &BIOMETRICS, None).unwrap();
        for code in ["AM", "DH", "HLM"] {
            h.store.add_to_location(code, &mine).await.unwrap();
        }
        h.store.fail_location("DH").await;

        h.say("/stoptrack").await;
        assert!(h.session.is_done());
        assert_eq!(h.last_text().await, prompts::TRACKING_STOPPED);
        assert!(h.store.entries("AM").await.is_empty());
        assert_eq!(h.store.entries("DH").await.len(), 1);
        assert!(h.store.entries("HLM").await.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_sends_notice() {
        let mut h = Harness::new();
        for text in ["/track", "Document pickup", "IND Amsterdam", "2"] {
            h.say(text).await;
        }
        h.store.set_failing(true).await;
        h.say("all").await;
        assert!(h.session.is_done());
        assert_eq!(h.last_text().await, prompts::SUBSCRIPTION_FAILED);
    }

    #[tokio::test]
    async fn undeliverable_prompt_ends_dialogue() {
        let mut h = Harness::new();
        h.channel
            .fail_for(ChatId(CHAT), SendFailure::Transient)
            .await;
        h.say("/track").await;
        assert!(h.session.is_done());
        assert_eq!(h.channel.failed_attempts(), 1);
    }
}
