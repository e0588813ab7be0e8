// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Starts and stops all pollers and the reporter.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use trakind_config::model::TrackerConfig;
use trakind_core::catalog::tracked_combinations;
use trakind_core::{ChannelAdapter, SubscriptionStore};

use crate::client::SlotsClient;
use crate::notify::Notifier;
use crate::poller::Poller;
use crate::report::run_reporter;

pub struct TrackerEngine {
    tasks: TaskTracker,
    cancel: CancellationToken,
    pollers: usize,
}

impl TrackerEngine {
    /// Spawns one poller per tracked combination plus the reporter.
    ///
    /// The engine stops when `parent` is cancelled or on [`shutdown`](Self::shutdown).
    pub fn start(
        config: &TrackerConfig,
        client: SlotsClient,
        channel: Arc<dyn ChannelAdapter>,
        store: Arc<dyn SubscriptionStore>,
        parent: &CancellationToken,
    ) -> Self {
        let cancel = parent.child_token();
        let tasks = TaskTracker::new();
        let interval = config.effective_interval();
        let notifier = Notifier::new(channel, store.clone());

        let combinations = tracked_combinations(config.max_people);
        let pollers = combinations.len();
        for combination in combinations {
            let poller = Poller::new(combination, client.clone(), store.clone(), notifier.clone());
            tasks.spawn(poller.run(interval, cancel.clone()));
        }
        tasks.spawn(run_reporter(store, config.report_interval(), cancel.clone()));
        tasks.close();

        info!(pollers, interval = ?interval, "tracker started");
        Self {
            tasks,
            cancel,
            pollers,
        }
    }

    pub fn poller_count(&self) -> usize {
        self.pollers
    }

    /// Cancels every task and waits until all have exited.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        self.tasks.wait().await;
        info!("tracker stopped");
    }
}
