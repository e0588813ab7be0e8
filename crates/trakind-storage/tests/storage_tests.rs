// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SQLite store through its public traits.

use std::sync::Arc;

use tempfile::tempdir;
use trakind_config::model::StorageConfig;
use trakind_core::catalog::{BIOMETRICS, DOCUMENT_PICKUP};
use trakind_core::{ChatId, Date, PluginAdapter, Subscription, SubscriptionStore, UserCounter};
use trakind_storage::SqliteStorage;

fn config(path: &std::path::Path) -> StorageConfig {
    StorageConfig {
        database_path: path.to_str().unwrap().to_string(),
        ..StorageConfig::default()
    }
}

#[tokio::test]
async fn subscriptions_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db/trakind.db");
    let sub = Subscription::new(
        ChatId(42),
        2,
        &DOCUMENT_PICKUP,
        Some(Date::parse("2024-06-01").unwrap()),
    )
    .unwrap();

    {
        let storage = SqliteStorage::new(config(&path));
        storage.initialize().await.unwrap();
        storage.add_to_location("AM", &sub).await.unwrap();
        storage.increment().await.unwrap();
        storage.shutdown().await.unwrap();
    }

    let storage = SqliteStorage::new(config(&path));
    storage.initialize().await.unwrap();
    assert_eq!(storage.get_for_location("AM").await.unwrap(), vec![sub]);
    assert_eq!(storage.get().await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_adds_with_dedup_store_one_row() {
    let dir = tempdir().unwrap();
    let storage = Arc::new(SqliteStorage::new(config(&dir.path().join("c.db"))));
    storage.initialize().await.unwrap();
    let sub = Subscription::new(ChatId(7), 3, &BIOMETRICS, None).unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let storage = Arc::clone(&storage);
        let sub = sub.clone();
        handles.push(tokio::spawn(async move {
            storage.add_to_location("HLM", &sub).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(storage.count_for_location("HLM").await.unwrap(), 1);
}

#[tokio::test]
async fn counter_increments_and_decrements_atomically() {
    let dir = tempdir().unwrap();
    let storage = Arc::new(SqliteStorage::new(config(&dir.path().join("u.db"))));
    storage.initialize().await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let storage = Arc::clone(&storage);
        handles.push(tokio::spawn(async move { storage.increment().await.unwrap() }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(storage.get().await.unwrap(), 10);
    assert_eq!(storage.decrement().await.unwrap(), 9);
}
