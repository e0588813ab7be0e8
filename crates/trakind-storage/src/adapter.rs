// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the subscription store and user counter.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use trakind_config::model::StorageConfig;
use trakind_core::{
    AdapterType, HealthStatus, PluginAdapter, Subscription, SubscriptionStore, TrakindError,
    UserCounter,
};

use crate::database::{Database, map_tr_err};
use crate::queries::{self, counters::USERS_COUNTER};

/// SQLite-backed storage adapter.
///
/// The database is opened lazily by [`SqliteStorage::initialize`]; every
/// other call fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The database connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wraps an already opened database.
    pub fn with_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    pub async fn initialize(&self) -> Result<(), TrakindError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| TrakindError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, TrakindError> {
        self.db.get().ok_or_else(|| TrakindError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, TrakindError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TrakindError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionStore for SqliteStorage {
    async fn add_to_location(
        &self,
        location: &str,
        subscription: &Subscription,
    ) -> Result<(), TrakindError> {
        let inserted = queries::subscriptions::add(
            self.db()?,
            location,
            subscription,
            self.config.deduplicate_subscriptions,
        )
        .await?;
        if !inserted {
            debug!(
                chat_id = %subscription.chat_id,
                location,
                "identical subscription already stored"
            );
        }
        Ok(())
    }

    async fn remove_from_location(
        &self,
        location: &str,
        subscription: &Subscription,
    ) -> Result<(), TrakindError> {
        let removed = queries::subscriptions::remove(self.db()?, location, subscription).await?;
        if removed > 0 {
            info!(chat_id = %subscription.chat_id, location, removed, "subscription rows deleted");
        }
        Ok(())
    }

    async fn get_for_location(&self, location: &str) -> Result<Vec<Subscription>, TrakindError> {
        queries::subscriptions::list_for_location(self.db()?, location).await
    }

    async fn count_for_location(&self, location: &str) -> Result<usize, TrakindError> {
        queries::subscriptions::count_for_location(self.db()?, location).await
    }
}

#[async_trait]
impl UserCounter for SqliteStorage {
    async fn increment(&self) -> Result<u64, TrakindError> {
        queries::counters::add(self.db()?, USERS_COUNTER, 1).await
    }

    async fn decrement(&self) -> Result<u64, TrakindError> {
        queries::counters::add(self.db()?, USERS_COUNTER, -1).await
    }

    async fn get(&self) -> Result<u64, TrakindError> {
        queries::counters::get(self.db()?, USERS_COUNTER).await
    }
}
