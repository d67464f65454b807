// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value preferences with last-write-wins semantics.

use lumen_core::LumenError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

pub async fn set_pref(db: &Database, key: &str, value: &str) -> Result<(), LumenError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO prefs (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_pref(db: &Database, key: &str) -> Result<Option<String>, LumenError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            match conn.query_row(
                "SELECT value FROM prefs WHERE key = ?1",
                params![key],
                |row| row.get(0),
            ) {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}
