// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One polling loop per tracked combination.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use trakind_core::catalog::TrackedCombination;
use trakind_core::matching::{count_additional_matches, first_match};
use trakind_core::{Subscription, SubscriptionStore};

use crate::client::SlotsClient;
use crate::notify::{Delivery, Notifier};

/// Longest period a ticker runs with: `i64::MAX` nanoseconds.
const MAX_PERIOD: Duration = Duration::from_secs(9_223_372_036);

/// A ticker whose first tick is one `period` from now. Periods too long to
/// schedule are clamped.
pub(crate) fn delayed_ticker(period: Duration) -> Interval {
    let period = period.min(MAX_PERIOD);
    let now = Instant::now();
    let start = now.checked_add(period).unwrap_or(now);
    let mut ticker = tokio::time::interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Result of one polling round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nobody follows this combination; no request was made.
    NoSubscribers,
    StoreUnavailable,
    FetchFailed,
    NoWindows,
    Notified {
        sent: usize,
        removed: usize,
        failed: usize,
    },
}

pub struct Poller {
    combination: TrackedCombination,
    client: SlotsClient,
    store: Arc<dyn SubscriptionStore>,
    notifier: Notifier,
}

impl Poller {
    pub fn new(
        combination: TrackedCombination,
        client: SlotsClient,
        store: Arc<dyn SubscriptionStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            combination,
            client,
            store,
            notifier,
        }
    }

    /// Polls every `interval` until `cancel` fires. The first poll happens
    /// one interval after start. A round in progress is abandoned on cancel.
    pub async fn run(self, interval: Duration, cancel: CancellationToken) {
        let TrackedCombination {
            location,
            action,
            people_count,
        } = self.combination;
        debug!(location = location.code, action = action.code, people_count, "tracking started");

        let mut ticker = delayed_ticker(interval);
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = self.tick() => {}
                    }
                }
            }
        }
        debug!(location = location.code, action = action.code, people_count, "tracking stopped");
    }

    /// One polling round.
    pub async fn tick(&self) -> TickOutcome {
        let TrackedCombination {
            location,
            action,
            people_count,
        } = self.combination;

        let subscriptions = match self.relevant_subscriptions().await {
            Some(subscriptions) => subscriptions,
            None => return TickOutcome::StoreUnavailable,
        };
        if subscriptions.is_empty() {
            return TickOutcome::NoSubscribers;
        }

        let slots = match self.client.fetch(location, action, people_count).await {
            Ok(slots) => slots,
            Err(e) => {
                warn!(
                    location = location.code,
                    action = action.code,
                    people_count,
                    url = %self.client.slots_url(location),
                    error = %e,
                    "error fetching slots"
                );
                return TickOutcome::FetchFailed;
            }
        };
        let windows = slots.data;
        if windows.is_empty() {
            return TickOutcome::NoWindows;
        }
        debug!(location = location.code, count = windows.len(), "windows available");

        let (mut sent, mut removed, mut failed) = (0, 0, 0);
        for subscription in &subscriptions {
            let Some(first) = first_match(subscription, &windows) else {
                continue;
            };
            let additional = count_additional_matches(subscription, &windows);
            match self
                .notifier
                .notify(location, action, subscription, first, additional)
                .await
            {
                Delivery::Sent => sent += 1,
                Delivery::Removed => removed += 1,
                Delivery::Failed => failed += 1,
            }
        }
        TickOutcome::Notified {
            sent,
            removed,
            failed,
        }
    }

    /// Subscriptions at this location for this poller's action and party
    /// size. `None` when the store could not be read.
    async fn relevant_subscriptions(&self) -> Option<Vec<Subscription>> {
        let TrackedCombination {
            location,
            action,
            people_count,
        } = self.combination;
        match self.store.get_for_location(location.code).await {
            Ok(mut subscriptions) => {
                subscriptions
                    .retain(|s| s.action == action.code && s.people_count == people_count);
                Some(subscriptions)
            }
            Err(e) => {
                warn!(location = location.code, error = %e, "could not retrieve subscriptions");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticker_waits_one_period_before_first_tick() {
        let start = Instant::now();
        let mut ticker = delayed_ticker(Duration::from_secs(60));
        ticker.tick().await;
        assert!(start.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test]
    async fn oversized_period_is_clamped() {
        let ticker = delayed_ticker(Duration::from_secs(18_000_000_000_000_000_000));
        assert_eq!(ticker.period(), MAX_PERIOD);
        let ticker = delayed_ticker(Duration::MAX);
        assert_eq!(ticker.period(), MAX_PERIOD);
    }
}
