// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription operations, keyed by location code.

use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use trakind_core::{ChatId, Date, Subscription, TrakindError};

use crate::database::{Database, map_tr_err};

/// Insert a subscription. With `deduplicate`, an identical row is not stored twice.
///
/// Returns `false` when the row already existed and nothing was inserted.
pub async fn add(
    db: &Database,
    location: &str,
    subscription: &Subscription,
    deduplicate: bool,
) -> Result<bool, TrakindError> {
    let location = location.to_string();
    let sub = subscription.clone();
    db.connection()
        .call(move |conn| {
            // Check and insert share one closure on the writer thread.
            if deduplicate && exists(conn, &location, &sub)? {
                return Ok(false);
            }
            conn.execute(
                "INSERT INTO subscriptions (location, chat_id, people_count, action, track_before)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    location,
                    sub.chat_id.0,
                    sub.people_count,
                    sub.action,
                    sub.track_before.map(|d| d.to_string()),
                ],
            )?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)
}

fn exists(conn: &Connection, location: &str, sub: &Subscription) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS (
             SELECT 1 FROM subscriptions
             WHERE location = ?1 AND chat_id = ?2 AND people_count = ?3
               AND action = ?4 AND track_before IS ?5
         )",
        params![
            location,
            sub.chat_id.0,
            sub.people_count,
            sub.action,
            sub.track_before.map(|d| d.to_string()),
        ],
        |row| row.get(0),
    )
}

/// Delete every row equal by value to `subscription`. Returns how many went.
pub async fn remove(
    db: &Database,
    location: &str,
    subscription: &Subscription,
) -> Result<usize, TrakindError> {
    let location = location.to_string();
    let sub = subscription.clone();
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM subscriptions
                 WHERE location = ?1 AND chat_id = ?2 AND people_count = ?3
                   AND action = ?4 AND track_before IS ?5",
                params![
                    location,
                    sub.chat_id.0,
                    sub.people_count,
                    sub.action,
                    sub.track_before.map(|d| d.to_string()),
                ],
            )?;
            Ok(removed)
        })
        .await
        .map_err(map_tr_err)
}

/// All subscriptions at a location, oldest first.
pub async fn list_for_location(
    db: &Database,
    location: &str,
) -> Result<Vec<Subscription>, TrakindError> {
    let location = location.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT chat_id, people_count, action, track_before
                 FROM subscriptions WHERE location = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt
                .query_map(params![location], row_to_subscription)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count_for_location(db: &Database, location: &str) -> Result<usize, TrakindError> {
    let location = location.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM subscriptions WHERE location = ?1",
                params![location],
                |row| row.get(0),
            )?;
            Ok(count as usize)
        })
        .await
        .map_err(map_tr_err)
}

fn row_to_subscription(row: &Row<'_>) -> rusqlite::Result<Subscription> {
    let track_before = row
        .get::<_, Option<String>>(3)?
        .map(|raw| {
            Date::parse(&raw)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))
        })
        .transpose()?;
    Ok(Subscription {
        chat_id: ChatId(row.get(0)?),
        people_count: row.get(1)?,
        action: row.get(2)?,
        track_before,
    })
}
