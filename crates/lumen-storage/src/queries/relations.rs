// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge-graph edges, unique on (subject, predicate, object).

use lumen_core::{LumenError, Relation};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Insert an edge, or find the existing one. Returns the row id either way.
pub async fn insert_relation(
    db: &Database,
    subject: &str,
    predicate: &str,
    object: &str,
    source_id: Option<i64>,
) -> Result<i64, LumenError> {
    let (subject, predicate, object) =
        (subject.to_string(), predicate.to_string(), object.to_string());
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO relations (subject, predicate, object, source_id)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(subject, predicate, object) DO NOTHING",
                params![subject, predicate, object, source_id],
            )?;
            let id = tx.query_row(
                "SELECT id FROM relations WHERE subject = ?1 AND predicate = ?2 AND object = ?3",
                params![subject, predicate, object],
                |row| row.get(0),
            )?;
            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(map_tr_err)
}

/// Edges matching every supplied field, most recent first.
pub async fn get_relations(
    db: &Database,
    subject: Option<&str>,
    predicate: Option<&str>,
    object: Option<&str>,
) -> Result<Vec<Relation>, LumenError> {
    let subject = subject.map(str::to_string);
    let predicate = predicate.map(str::to_string);
    let object = object.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, subject, predicate, object, source_id, created_at FROM relations
                 WHERE (?1 IS NULL OR subject = ?1)
                   AND (?2 IS NULL OR predicate = ?2)
                   AND (?3 IS NULL OR object = ?3)
                 ORDER BY id DESC",
            )?;
            let relations = stmt
                .query_map(params![subject, predicate, object], |row| {
                    Ok(Relation {
                        id: row.get(0)?,
                        subject: row.get(1)?,
                        predicate: row.get(2)?,
                        object: row.get(3)?,
                        source_id: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(relations)
        })
        .await
        .map_err(map_tr_err)
}

/// One-hop outgoing edges of `subject` as (predicate, object).
pub async fn neighbors(db: &Database, subject: &str) -> Result<Vec<(String, String)>, LumenError> {
    Ok(get_relations(db, Some(subject), None, None)
        .await?
        .into_iter()
        .map(|r| (r.predicate, r.object))
        .collect())
}

/// One-hop incoming edges of `object` as (subject, predicate).
pub async fn inverse_neighbors(
    db: &Database,
    object: &str,
) -> Result<Vec<(String, String)>, LumenError> {
    Ok(get_relations(db, None, None, Some(object))
        .await?
        .into_iter()
        .map(|r| (r.subject, r.predicate))
        .collect())
}

pub async fn count_relations(db: &Database) -> Result<i64, LumenError> {
    db.connection()
        .call(|conn| conn.query_row("SELECT COUNT(*) FROM relations", [], |row| row.get(0)))
        .await
        .map_err(map_tr_err)
}
