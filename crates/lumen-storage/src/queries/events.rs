// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only event log.

use lumen_core::{Event, LumenError};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Append an event and return its id.
pub async fn insert_event(db: &Database, kind: &str, content: &str) -> Result<i64, LumenError> {
    let kind = kind.to_string();
    let content = content.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO events (type, content) VALUES (?1, ?2)",
                params![kind, content],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Events of `kind` (or all events), most recent first.
pub async fn get_events(db: &Database, kind: Option<&str>) -> Result<Vec<Event>, LumenError> {
    let kind = kind.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, type, content, created_at FROM events
                 WHERE (?1 IS NULL OR type = ?1) ORDER BY id DESC",
            )?;
            let events = stmt
                .query_map(params![kind], |row| {
                    Ok(Event {
                        id: row.get(0)?,
                        kind: row.get(1)?,
                        content: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(events)
        })
        .await
        .map_err(map_tr_err)
}

/// Total number of events.
pub async fn count_events(db: &Database) -> Result<i64, LumenError> {
    db.connection()
        .call(|conn| conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0)))
        .await
        .map_err(map_tr_err)
}
