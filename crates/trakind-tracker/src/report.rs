// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic subscriber count report.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use trakind_core::SubscriptionStore;
use trakind_core::catalog::LOCATIONS;

use crate::poller::delayed_ticker;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionReport {
    /// `(location code, subscription count)` in catalog order.
    pub per_location: Vec<(&'static str, usize)>,
    /// Locations whose count could not be read.
    pub unavailable: Vec<&'static str>,
}

impl SubscriptionReport {
    pub fn total(&self) -> usize {
        self.per_location.iter().map(|(_, count)| count).sum()
    }
}

/// Counts subscriptions at every location. A failing location is recorded
/// as unavailable and does not affect the others.
pub async fn collect_report(store: &dyn SubscriptionStore) -> SubscriptionReport {
    let mut report = SubscriptionReport::default();
    for location in LOCATIONS {
        match store.count_for_location(location.code).await {
            Ok(count) => report.per_location.push((location.code, count)),
            Err(e) => {
                warn!(location = location.code, error = %e, "failed to count subscriptions");
                report.unavailable.push(location.code);
            }
        }
    }
    report
}

pub fn log_report(report: &SubscriptionReport) {
    for (location, count) in &report.per_location {
        info!(location, count, "subscriptions");
    }
    info!(
        total = report.total(),
        unavailable = report.unavailable.len(),
        "subscriptions total"
    );
}

/// Logs a report every `interval` until `cancel` fires.
pub async fn run_reporter(
    store: Arc<dyn SubscriptionStore>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = delayed_ticker(interval);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let report = collect_report(store.as_ref()).await;
                log_report(&report);
            }
        }
    }
    debug!("reporter stopped");
}
