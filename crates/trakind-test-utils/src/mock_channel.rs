// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use trakind_core::types::OutboundMessage;
use trakind_core::{
    AdapterType, ChannelAdapter, ChatId, HealthStatus, InboundMessage, MessageId, PluginAdapter,
    TrakindError,
};

/// How `send` should fail for a given chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
    /// `TrakindError::RecipientGone`.
    Gone,
    /// `TrakindError::Channel`.
    Transient,
}

/// A mock messaging channel for testing.
///
/// - **inbound**: messages injected via `inject_message()` are returned by `receive()`
/// - **sent**: messages accepted by `send()` are captured for assertions
/// - **failures**: chats configured with `fail_for()` get an error instead
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    failures: Arc<Mutex<HashMap<ChatId, SendFailure>>>,
    failed_attempts: AtomicU64,
    next_id: AtomicU64,
    inbound_notify: Arc<Notify>,
    sent_notify: Arc<Notify>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            failed_attempts: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
            inbound_notify: Arc::new(Notify::new()),
            sent_notify: Arc::new(Notify::new()),
        }
    }

    /// Queue an inbound message. The next `receive()` returns it.
    pub async fn inject_message(&self, msg: InboundMessage) {
        self.inbound.lock().await.push_back(msg);
        self.inbound_notify.notify_one();
    }

    /// Queue a text (or `/command`) from `chat`.
    pub async fn inject_text(&self, chat: i64, text: &str) {
        self.inject_message(InboundMessage::new(ChatId(chat), text)).await;
    }

    /// Make every later `send` to `chat` fail.
    pub async fn fail_for(&self, chat: ChatId, failure: SendFailure) {
        self.failures.lock().await.insert(chat, failure);
    }

    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Texts sent to one chat, in order.
    pub async fn texts_to(&self, chat: i64) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.chat_id == ChatId(chat))
            .map(|m| m.text.clone())
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Number of sends rejected through failure injection.
    pub fn failed_attempts(&self) -> u64 {
        self.failed_attempts.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` messages were sent, or `timeout` elapses.
    /// Returns whether the count was reached.
    pub async fn wait_for_sent(&self, count: usize, timeout: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.sent_notify.notified();
                if self.sent.lock().await.len() >= count {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, wait).await.is_ok()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, TrakindError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TrakindError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), TrakindError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, TrakindError> {
        let failure = self.failures.lock().await.get(&msg.chat_id).copied();
        if let Some(failure) = failure {
            self.failed_attempts.fetch_add(1, Ordering::SeqCst);
            return Err(match failure {
                SendFailure::Gone => TrakindError::RecipientGone {
                    chat_id: msg.chat_id,
                    reason: "Forbidden: user is deactivated".into(),
                },
                SendFailure::Transient => TrakindError::Channel {
                    message: "mock transient failure".into(),
                    source: None,
                },
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().await.push(msg);
        self.sent_notify.notify_waiters();
        Ok(MessageId(format!("mock-msg-{id}")))
    }

    async fn receive(&self) -> Result<InboundMessage, TrakindError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(msg) = queue.pop_front() {
                    return Ok(msg);
                }
            }
            self.inbound_notify.notified().await;
        }
    }
}
