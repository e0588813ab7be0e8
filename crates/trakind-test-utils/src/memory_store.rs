// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory subscription store and user counter.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use trakind_core::{Subscription, SubscriptionStore, TrakindError, UserCounter};

#[derive(Default)]
struct Inner {
    by_location: HashMap<String, Vec<Subscription>>,
    users: u64,
    failing: bool,
    failing_locations: HashSet<String>,
}

impl Inner {
    fn check(&self, location: Option<&str>) -> Result<(), TrakindError> {
        let location_down = location.is_some_and(|l| self.failing_locations.contains(l));
        if self.failing || location_down {
            return Err(TrakindError::Storage {
                source: "injected storage failure".into(),
            });
        }
        Ok(())
    }
}

/// A [`SubscriptionStore`] and [`UserCounter`] held in memory.
///
/// Honours the same deduplication flag as the SQLite store.
pub struct MemoryStore {
    inner: Mutex<Inner>,
    deduplicate: bool,
}

impl MemoryStore {
    /// A deduplicating store.
    pub fn new() -> Self {
        Self::with_dedup(true)
    }

    pub fn with_dedup(deduplicate: bool) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            deduplicate,
        }
    }

    /// When set, every operation fails with a storage error.
    pub async fn set_failing(&self, failing: bool) {
        self.inner.lock().await.failing = failing;
    }

    /// Operations on `location` fail until [`restore_location`](Self::restore_location).
    pub async fn fail_location(&self, location: &str) {
        self.inner
            .lock()
            .await
            .failing_locations
            .insert(location.to_string());
    }

    pub async fn restore_location(&self, location: &str) {
        self.inner.lock().await.failing_locations.remove(location);
    }

    /// Stored entries for `location`, bypassing failure injection.
    pub async fn entries(&self, location: &str) -> Vec<Subscription> {
        self.inner
            .lock()
            .await
            .by_location
            .get(location)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of entries across all locations.
    pub async fn total(&self) -> usize {
        self.inner.lock().await.by_location.values().map(Vec::len).sum()
    }

    pub async fn users(&self) -> u64 {
        self.inner.lock().await.users
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn add_to_location(
        &self,
        location: &str,
        subscription: &Subscription,
    ) -> Result<(), TrakindError> {
        let mut inner = self.inner.lock().await;
        inner.check(Some(location))?;
        let entries = inner.by_location.entry(location.to_string()).or_default();
        if self.deduplicate && entries.contains(subscription) {
            return Ok(());
        }
        entries.push(subscription.clone());
        Ok(())
    }

    async fn remove_from_location(
        &self,
        location: &str,
        subscription: &Subscription,
    ) -> Result<(), TrakindError> {
        let mut inner = self.inner.lock().await;
        inner.check(Some(location))?;
        if let Some(entries) = inner.by_location.get_mut(location) {
            entries.retain(|s| s != subscription);
        }
        Ok(())
    }

    async fn get_for_location(&self, location: &str) -> Result<Vec<Subscription>, TrakindError> {
        let inner = self.inner.lock().await;
        inner.check(Some(location))?;
        Ok(inner.by_location.get(location).cloned().unwrap_or_default())
    }

    async fn count_for_location(&self, location: &str) -> Result<usize, TrakindError> {
        let inner = self.inner.lock().await;
        inner.check(Some(location))?;
        Ok(inner.by_location.get(location).map_or(0, Vec::len))
    }
}

#[async_trait]
impl UserCounter for MemoryStore {
    async fn increment(&self) -> Result<u64, TrakindError> {
        let mut inner = self.inner.lock().await;
        inner.check(None)?;
        inner.users += 1;
        Ok(inner.users)
    }

    async fn decrement(&self) -> Result<u64, TrakindError> {
        let mut inner = self.inner.lock().await;
        inner.check(None)?;
        inner.users = inner.users.saturating_sub(1);
        Ok(inner.users)
    }

    async fn get(&self) -> Result<u64, TrakindError> {
        let inner = self.inner.lock().await;
        inner.check(None)?;
        Ok(inner.users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trakind_core::ChatId;
    use trakind_core::catalog::DOCUMENT_PICKUP;

    fn sub(chat: i64) -> Subscription {
        Subscription::new(ChatId(chat), 1, &DOCUMENT_PICKUP, None).unwrap()
    }

    #[tokio::test]
    async fn dedup_and_value_removal() {
        let store = MemoryStore::new();
        store.add_to_location("AM", &sub(1)).await.unwrap();
        store.add_to_location("AM", &sub(1)).await.unwrap();
        assert_eq!(store.count_for_location("AM").await.unwrap(), 1);

        let dupes = MemoryStore::with_dedup(false);
        dupes.add_to_location("AM", &sub(1)).await.unwrap();
        dupes.add_to_location("AM", &sub(1)).await.unwrap();
        dupes.remove_from_location("AM", &sub(1)).await.unwrap();
        assert_eq!(dupes.total().await, 0);
    }

    #[tokio::test]
    async fn failure_injection_is_scoped() {
        let store = MemoryStore::new();
        store.fail_location("DH").await;
        assert!(store.get_for_location("DH").await.is_err());
        assert!(store.get_for_location("AM").await.unwrap().is_empty());

        store.set_failing(true).await;
        assert!(store.increment().await.is_err());
        store.set_failing(false).await;
        assert_eq!(store.increment().await.unwrap(), 1);
        assert_eq!(store.decrement().await.unwrap(), 0);
        assert_eq!(store.decrement().await.unwrap(), 0);
    }
}
