// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fact rows and their provenance.

use lumen_core::{Fact, LumenError};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

const FACT_COLUMNS: &str = "id, key, value, source_id, created_at";

fn row_to_fact(row: &rusqlite::Row<'_>) -> rusqlite::Result<Fact> {
    Ok(Fact {
        id: row.get(0)?,
        key: row.get(1)?,
        value: row.get(2)?,
        source_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a fact and return its id.
///
/// A `source_id` that names no source row is rejected by the foreign key.
pub async fn insert_fact(
    db: &Database,
    key: &str,
    value: &str,
    source_id: Option<i64>,
) -> Result<i64, LumenError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO facts (key, value, source_id) VALUES (?1, ?2, ?3)",
                params![key, value, source_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Facts under `key` (or all facts), most recent first.
pub async fn get_facts(db: &Database, key: Option<&str>) -> Result<Vec<Fact>, LumenError> {
    let key = key.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {FACT_COLUMNS} FROM facts
                 WHERE (?1 IS NULL OR key = ?1) ORDER BY id DESC"
            ))?;
            let facts = stmt
                .query_map(params![key], row_to_fact)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(facts)
        })
        .await
        .map_err(map_tr_err)
}

/// Insert one source and one fact per `(url, title)` pair in a single
/// transaction. Returns the id of the last fact row; with no sources, a
/// single sourceless fact is written.
pub async fn insert_fact_with_sources(
    db: &Database,
    key: &str,
    value: &str,
    sources: &[(String, String)],
) -> Result<i64, LumenError> {
    let key = key.to_string();
    let value = value.to_string();
    let sources = sources.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut last_id = None;
            for (url, title) in &sources {
                tx.execute(
                    "INSERT INTO sources (url, title) VALUES (?1, ?2)",
                    params![url, title],
                )?;
                let source_id = tx.last_insert_rowid();
                tx.execute(
                    "INSERT INTO facts (key, value, source_id) VALUES (?1, ?2, ?3)",
                    params![key, value, source_id],
                )?;
                last_id = Some(tx.last_insert_rowid());
            }
            let id = match last_id {
                Some(id) => id,
                None => {
                    tx.execute(
                        "INSERT INTO facts (key, value, source_id) VALUES (?1, ?2, NULL)",
                        params![key, value],
                    )?;
                    tx.last_insert_rowid()
                }
            };
            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(map_tr_err)
}

/// Distinct source URLs cited by facts under `key`, newest fact first,
/// capped at `limit`. Facts without a source are skipped.
pub async fn citation_urls_for_key(
    db: &Database,
    key: &str,
    limit: usize,
) -> Result<Vec<String>, LumenError> {
    if limit == 0 {
        return Ok(Vec::new());
    }
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT s.url FROM facts f
                 JOIN sources s ON s.id = f.source_id
                 WHERE f.key = ?1 ORDER BY f.id DESC",
            )?;
            let mut urls: Vec<String> = Vec::new();
            let mut rows = stmt.query(params![key])?;
            while let Some(row) = rows.next()? {
                let url: String = row.get(0)?;
                if url.is_empty() || urls.contains(&url) {
                    continue;
                }
                urls.push(url);
                if urls.len() == limit {
                    break;
                }
            }
            Ok(urls)
        })
        .await
        .map_err(map_tr_err)
}

/// Total number of fact rows.
pub async fn count_facts(db: &Database) -> Result<i64, LumenError> {
    db.connection()
        .call(|conn| conn.query_row("SELECT COUNT(*) FROM facts", [], |row| row.get(0)))
        .await
        .map_err(map_tr_err)
}
