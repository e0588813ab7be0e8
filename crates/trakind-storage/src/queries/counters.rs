// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named non-negative counters.

use rusqlite::{OptionalExtension, params};
use trakind_core::TrakindError;

use crate::database::{Database, map_tr_err};

/// Key of the active user counter.
pub const USERS_COUNTER: &str = "usersCounter";

/// Adds `delta` (which may be negative) and returns the new value, floored at zero.
pub async fn add(db: &Database, name: &str, delta: i64) -> Result<u64, TrakindError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let value: i64 = conn.query_row(
                "INSERT INTO counters (name, value) VALUES (?1, MAX(?2, 0))
                 ON CONFLICT (name) DO UPDATE SET value = MAX(value + ?2, 0)
                 RETURNING value",
                params![name, delta],
                |row| row.get(0),
            )?;
            Ok(value.max(0) as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Current value; zero for a counter never written.
pub async fn get(db: &Database, name: &str) -> Result<u64, TrakindError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let value: Option<i64> = conn
                .query_row(
                    "SELECT value FROM counters WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value.unwrap_or(0).max(0) as u64)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counter_goes_up_and_down_but_not_below_zero() {
        let db = Database::open_in_memory().await.unwrap();
        assert_eq!(get(&db, USERS_COUNTER).await.unwrap(), 0);
        assert_eq!(add(&db, USERS_COUNTER, 1).await.unwrap(), 1);
        assert_eq!(add(&db, USERS_COUNTER, 1).await.unwrap(), 2);
        assert_eq!(add(&db, USERS_COUNTER, -1).await.unwrap(), 1);
        assert_eq!(add(&db, USERS_COUNTER, -1).await.unwrap(), 0);
        assert_eq!(add(&db, USERS_COUNTER, -1).await.unwrap(), 0);
        assert_eq!(get(&db, USERS_COUNTER).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn first_decrement_creates_zero_row() {
        let db = Database::open_in_memory().await.unwrap();
        assert_eq!(add(&db, "other", -1).await.unwrap(), 0);
        assert_eq!(add(&db, "other", 1).await.unwrap(), 1);
    }
}
