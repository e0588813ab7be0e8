// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes inbound messages to per-chat sessions.
//!
//! Each chat with a dialogue in progress owns a worker task and a queue in
//! the session table. Messages of one chat are handled in arrival order;
//! different chats run concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use trakind_core::{ChatId, InboundMessage, TrakindError};

use crate::session::{DialogueServices, DialogueSession};

type SessionTable = Arc<Mutex<HashMap<ChatId, mpsc::UnboundedSender<InboundMessage>>>>;

/// Grace period for sessions still working when shutdown starts.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct DialogueRouter {
    services: DialogueServices,
    sessions: SessionTable,
    workers: TaskTracker,
}

impl DialogueRouter {
    pub fn new(services: DialogueServices) -> Self {
        Self {
            services,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            workers: TaskTracker::new(),
        }
    }

    /// Receives messages from the channel until `cancel` fires, then waits
    /// for running sessions to finish.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), TrakindError> {
        info!("dialogue router started");
        loop {
            tokio::select! {
                result = self.services.channel.receive() => {
                    match result {
                        Ok(msg) => self.route(msg).await,
                        Err(e) => {
                            error!(error = %e, "error receiving message");
                            // Avoid a hot loop on a broken channel.
                            tokio::time::sleep(Duration::from_millis(100)).await;
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping dialogue router");
                    break;
                }
            }
        }
        self.drain(DRAIN_TIMEOUT).await;
        Ok(())
    }

    /// Hands `msg` to its chat's session, starting one if none is active.
    pub async fn route(&self, msg: InboundMessage) {
        let chat_id = msg.chat_id;
        let mut sessions = self.sessions.lock().await;

        let msg = match sessions.get(&chat_id) {
            Some(tx) => match tx.send(msg) {
                Ok(()) => return,
                // Worker gone without cleaning up; start over.
                Err(mpsc::error::SendError(msg)) => msg,
            },
            None => msg,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        // The receiver is alive, so this cannot fail.
        let _ = tx.send(msg);
        sessions.insert(chat_id, tx);
        debug!(%chat_id, "session started");
        self.workers.spawn(run_session(
            chat_id,
            rx,
            self.services.clone(),
            self.sessions.clone(),
        ));
    }

    /// Number of chats with a dialogue in progress.
    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Closes all session queues and waits up to `timeout` for workers.
    pub async fn drain(&self, timeout: Duration) {
        let active = {
            let mut sessions = self.sessions.lock().await;
            let active = sessions.len();
            sessions.clear();
            active
        };
        self.workers.close();
        if active > 0 {
            info!(active, "draining dialogue sessions");
        }
        if tokio::time::timeout(timeout, self.workers.wait()).await.is_err() {
            warn!(
                remaining = self.workers.len(),
                "dialogue sessions still running after drain timeout"
            );
        }
    }
}

async fn run_session(
    chat_id: ChatId,
    mut rx: mpsc::UnboundedReceiver<InboundMessage>,
    services: DialogueServices,
    sessions: SessionTable,
) {
    let mut session = DialogueSession::new(chat_id, services.clone());
    let mut pending = None;
    loop {
        let msg = match pending.take() {
            Some(msg) => msg,
            None => match rx.recv().await {
                Some(msg) => msg,
                None => break,
            },
        };
        session.handle(&msg).await;
        if !session.is_done() {
            continue;
        }

        // The router only enqueues while holding the table lock, so an
        // empty queue seen under the lock stays empty once we are removed.
        let mut table = sessions.lock().await;
        match rx.try_recv() {
            Ok(next) => {
                drop(table);
                pending = Some(next);
                session = DialogueSession::new(chat_id, services.clone());
            }
            Err(_) => {
                table.remove(&chat_id);
                debug!(%chat_id, "session finished");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trakind_test_utils::{MemoryStore, MockChannel};

    fn router() -> (DialogueRouter, Arc<MockChannel>, Arc<MemoryStore>) {
        let channel = Arc::new(MockChannel::new());
        let store = Arc::new(MemoryStore::new());
        let services = DialogueServices {
            channel: channel.clone(),
            store: store.clone(),
            counter: store.clone(),
        };
        (DialogueRouter::new(services), channel, store)
    }

    #[tokio::test]
    async fn finished_session_leaves_table() {
        let (router, channel, _) = router();
        router.route(InboundMessage::new(ChatId(1), "/start")).await;
        assert!(channel.wait_for_sent(1, Duration::from_secs(2)).await);
        let emptied = tokio::time::timeout(Duration::from_secs(2), async {
            while router.active_sessions().await > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(emptied.is_ok());
    }

    #[tokio::test]
    async fn ongoing_dialogue_keeps_its_session() {
        let (router, channel, _) = router();
        router.route(InboundMessage::new(ChatId(1), "/track")).await;
        assert!(channel.wait_for_sent(1, Duration::from_secs(2)).await);
        assert_eq!(router.active_sessions().await, 1);
    }
}
