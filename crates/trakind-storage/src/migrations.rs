// SPDX-FileCopyrightText: 2026 Trakind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary and applied
//! on every open. Refinery records applied versions in
//! `refinery_schema_history`.

use trakind_core::TrakindError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), TrakindError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| TrakindError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
